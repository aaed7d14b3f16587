//! Contact form submission and admin triage.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use seatwise_core::ContactSubmission;
use seatwise_store::Store;

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

const MAX_MESSAGE_BYTES: usize = 4_096;

/// Contact form payload.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Optional callback number.
    #[serde(default)]
    pub mobile: Option<String>,
    /// The message body.
    pub message: String,
}

/// Submission acknowledgement.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    /// Submission id, quotable in follow-ups.
    pub id: Uuid,
}

/// Accept a contact form submission. No authentication required.
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    let name = body.name.trim();
    let email = body.email.trim();
    let message = body.message.trim();

    if name.is_empty() || message.is_empty() {
        return Err(ApiError::BadRequest("Name and message are required".into()));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest("A valid email is required".into()));
    }
    if message.len() > MAX_MESSAGE_BYTES {
        return Err(ApiError::BadRequest("Message is too long".into()));
    }

    let submission = ContactSubmission::new(
        name.to_string(),
        email.to_lowercase(),
        body.mobile.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
        message.to_string(),
    );
    state.store.put_contact_submission(&submission)?;

    tracing::info!(id = %submission.id, "Contact submission received");

    Ok(Json(ContactResponse { id: submission.id }))
}

/// Admin listing filter.
#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    /// When true, only unresolved submissions are returned.
    #[serde(default)]
    pub unresolved_only: bool,
}

/// One submission in the admin view.
#[derive(Debug, Serialize)]
pub struct ContactEntry {
    /// Submission id.
    pub id: Uuid,
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Callback number, when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// Message body.
    pub message: String,
    /// Whether an admin has resolved it.
    pub resolved: bool,
    /// Submission timestamp.
    pub created_at: String,
}

/// Admin listing response.
#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    /// Submissions, newest first.
    pub submissions: Vec<ContactEntry>,
}

/// List contact submissions (admin only).
pub async fn list_contact(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let submissions = state
        .store
        .list_contact_submissions(query.unresolved_only)?
        .into_iter()
        .map(|s| ContactEntry {
            id: s.id,
            name: s.name,
            email: s.email,
            mobile: s.mobile,
            message: s.message,
            resolved: s.resolved,
            created_at: s.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ContactListResponse { submissions }))
}

/// Resolution acknowledgement.
#[derive(Debug, Serialize)]
pub struct ResolveContactResponse {
    /// Submission id.
    pub id: Uuid,
    /// Always true after a successful resolve.
    pub resolved: bool,
}

/// Mark a contact submission resolved (admin only). Idempotent.
pub async fn resolve_contact(
    State(state): State<Arc<AppState>>,
    admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<ResolveContactResponse>, ApiError> {
    let mut submission = state
        .store
        .get_contact_submission(&id)?
        .ok_or_else(|| ApiError::NotFound("Submission not found".into()))?;

    if !submission.resolved {
        submission.resolve();
        state.store.put_contact_submission(&submission)?;
    }

    tracing::info!(admin_id = %admin.admin_id, id = %id, "Contact submission resolved");

    Ok(Json(ResolveContactResponse { id, resolved: true }))
}
