//! College detail view gating.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use seatwise_core::{CreditTransaction, COLLEGE_DETAIL_COST_CREDITS};
use seatwise_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// College view request.
#[derive(Debug, Deserialize)]
pub struct ViewCollegeRequest {
    /// Institute whose detail page is being opened.
    pub institute: String,
}

/// College view response.
#[derive(Debug, Serialize)]
pub struct ViewCollegeResponse {
    /// Balance after the deduction.
    pub balance: i64,
    /// Credits charged.
    pub cost: i64,
}

/// Charge the detail-page fee for one institute.
///
/// The detail content itself is served by the frontend from the cutoff
/// data; this endpoint is the paywall in front of it.
pub async fn view_college(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<ViewCollegeRequest>,
) -> Result<Json<ViewCollegeResponse>, ApiError> {
    if body.institute.trim().is_empty() {
        return Err(ApiError::BadRequest("Institute is required".into()));
    }

    let tx = CreditTransaction::college_view(
        auth.user_id,
        COLLEGE_DETAIL_COST_CREDITS,
        0,
        body.institute.trim(),
    );
    let balance = state.store.debit_credits(&auth.user_id, &tx)?;

    tracing::info!(
        user_id = %auth.user_id,
        institute = %body.institute.trim(),
        new_balance = balance,
        "College detail view charged"
    );

    Ok(Json(ViewCollegeResponse {
        balance,
        cost: COLLEGE_DETAIL_COST_CREDITS,
    }))
}
