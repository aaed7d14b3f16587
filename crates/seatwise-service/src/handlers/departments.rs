//! Saved-department shortlist handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use seatwise_core::{Quota, SavedDepartment, SeatGender};
use seatwise_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Save request: the identifying seat tuple plus the candidate's rank.
#[derive(Debug, Deserialize)]
pub struct SaveDepartmentRequest {
    /// Institute name.
    pub institute: String,
    /// Department / branch name.
    pub department: String,
    /// Quota of the seat.
    pub quota: Quota,
    /// Gender pool of the seat.
    pub seat_gender: SeatGender,
    /// Seat-type label.
    pub seat_type: String,
    /// The candidate's rank at save time.
    pub rank: u64,
}

/// Save response.
#[derive(Debug, Serialize)]
pub struct SaveDepartmentResponse {
    /// Entry id (stable across re-saves of the same seat).
    pub id: String,
    /// Whether a new entry was created (false on re-save).
    pub created: bool,
}

/// Save a department to the shortlist.
pub async fn save_department(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<SaveDepartmentRequest>,
) -> Result<Json<SaveDepartmentResponse>, ApiError> {
    if body.institute.trim().is_empty() || body.department.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Institute and department are required".into(),
        ));
    }

    let saved = SavedDepartment {
        user_id: auth.user_id,
        institute: body.institute.trim().to_string(),
        department: body.department.trim().to_string(),
        quota: body.quota,
        seat_gender: body.seat_gender,
        seat_type: body.seat_type.trim().to_string(),
        rank_at_save: body.rank,
        created_at: chrono::Utc::now(),
    };

    let (id, created) = state.store.save_department(&saved)?;

    tracing::info!(
        user_id = %auth.user_id,
        institute = %saved.institute,
        department = %saved.department,
        created,
        "Department saved"
    );

    Ok(Json(SaveDepartmentResponse { id, created }))
}

/// One shortlist entry in the listing.
#[derive(Debug, Serialize)]
pub struct SavedEntry {
    /// Entry id.
    pub id: String,
    /// Institute name.
    pub institute: String,
    /// Department / branch name.
    pub department: String,
    /// Quota of the seat.
    pub quota: Quota,
    /// Gender pool of the seat.
    pub seat_gender: SeatGender,
    /// Seat-type label.
    pub seat_type: String,
    /// The candidate's rank when the seat was saved.
    pub rank_at_save: u64,
    /// Creation timestamp.
    pub created_at: String,
}

/// Shortlist response.
#[derive(Debug, Serialize)]
pub struct SavedListResponse {
    /// Entries, newest first.
    pub saved: Vec<SavedEntry>,
}

/// List the current user's shortlist.
pub async fn list_saved(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<SavedListResponse>, ApiError> {
    let entries = state.store.list_saved_departments(&auth.user_id)?;

    let saved = entries
        .into_iter()
        .map(|(id, entry)| SavedEntry {
            id,
            institute: entry.institute,
            department: entry.department,
            quota: entry.quota,
            seat_gender: entry.seat_gender,
            seat_type: entry.seat_type,
            rank_at_save: entry.rank_at_save,
            created_at: entry.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(SavedListResponse { saved }))
}

/// Delete one shortlist entry.
pub async fn delete_saved(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.delete_saved_department(&auth.user_id, &id)?;

    tracing::info!(user_id = %auth.user_id, id = %id, "Saved department deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
