//! Admin cutoff import.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use seatwise_core::{CoreError, CutoffId, CutoffRow, InstituteType, Quota, SeatGender};
use seatwise_store::Store;

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// One row in an import payload. Label fields use the same strings the
/// published counseling data does.
#[derive(Debug, Deserialize)]
pub struct CutoffImportRow {
    /// Institute display name.
    pub institute: String,
    /// Institute classification label (`IIT`, `NIT`, `IIIT`, `GFTI`).
    pub institute_type: String,
    /// State the institute belongs to.
    pub institute_state: String,
    /// Department / academic program name.
    pub department: String,
    /// Quota label (`AI`, `HS`, `OS`, ...).
    pub quota: String,
    /// Seat-type label (e.g. `OPEN`, `OBC-NCL (PwD)`).
    pub seat_type: String,
    /// Seat gender label.
    pub seat_gender: String,
    /// Opening rank.
    pub opening_rank: u64,
    /// Closing rank.
    pub closing_rank: u64,
    /// Academic year.
    pub year: u16,
    /// Counseling round.
    pub round: u8,
    /// Optional ordering priority for the institute.
    #[serde(default)]
    pub institute_ranking: Option<u32>,
}

/// Bulk import request.
#[derive(Debug, Deserialize)]
pub struct ImportCutoffsRequest {
    /// Rows to import.
    pub rows: Vec<CutoffImportRow>,
}

/// Import response.
#[derive(Debug, Serialize)]
pub struct ImportCutoffsResponse {
    /// Rows stored.
    pub imported: usize,
    /// Total rows in the cutoff table after the import.
    pub total: u64,
}

fn convert_row(row: CutoffImportRow) -> Result<CutoffRow, CoreError> {
    if row.closing_rank < row.opening_rank {
        return Err(CoreError::InvalidRankRange {
            opening: row.opening_rank,
            closing: row.closing_rank,
        });
    }
    Ok(CutoffRow {
        id: CutoffId::generate(),
        institute: row.institute,
        institute_type: InstituteType::parse(&row.institute_type)?,
        institute_state: row.institute_state,
        department: row.department,
        quota: Quota::parse(&row.quota)?,
        seat_type: row.seat_type,
        seat_gender: SeatGender::parse(&row.seat_gender)?,
        opening_rank: row.opening_rank,
        closing_rank: row.closing_rank,
        year: row.year,
        round: row.round,
        institute_ranking: row.institute_ranking,
    })
}

/// Bulk-import cutoff rows (admin only).
///
/// Any invalid label in the payload rejects the whole batch; rows are
/// only written once every row has parsed.
pub async fn import_cutoffs(
    State(state): State<Arc<AppState>>,
    admin: AdminAuth,
    Json(body): Json<ImportCutoffsRequest>,
) -> Result<Json<ImportCutoffsResponse>, ApiError> {
    if body.rows.is_empty() {
        return Err(ApiError::BadRequest("No rows to import".into()));
    }

    let rows: Vec<CutoffRow> = body
        .rows
        .into_iter()
        .map(convert_row)
        .collect::<Result<_, _>>()?;

    let imported = rows.len();
    state.store.put_cutoffs(&rows)?;
    let total = state.store.count_cutoffs()?;

    tracing::info!(
        admin_id = %admin.admin_id,
        imported,
        total,
        "Cutoff rows imported"
    );

    Ok(Json(ImportCutoffsResponse { imported, total }))
}
