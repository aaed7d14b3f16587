//! Prediction handlers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use seatwise_core::{
    group_results, query_plan, rank_from_percentile, CandidateProfile, Category,
    CreditTransaction, ExamType, Gender, InstitutePrediction, Prediction, PredictionId,
    PREDICTION_COST_CREDITS,
};
use seatwise_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Prediction request. Exactly one of `rank` and `percentile` must be set.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Exam rank, when known directly.
    pub rank: Option<u64>,
    /// Percentile, converted to an approximate rank.
    pub percentile: Option<f64>,
    /// Category rank, when the candidate has one.
    pub category_rank: Option<u64>,
    /// Reservation category.
    pub category: Category,
    /// Gender.
    pub gender: Gender,
    /// Home state (for home-state quota queries).
    pub home_state: String,
    /// PwD status.
    #[serde(default)]
    pub pwd: bool,
    /// Which exam the rank belongs to.
    pub exam: ExamType,
}

/// Prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Snapshot id for later retrieval.
    pub prediction_id: String,
    /// The rank the prediction ran against.
    pub rank: u64,
    /// Grouped results in display order.
    pub results: Vec<InstitutePrediction>,
    /// Balance after the deduction.
    pub balance: i64,
    /// Credits charged.
    pub cost: i64,
}

/// Run a prediction, store the snapshot, and debit the prediction cost.
pub async fn create_prediction(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let rank = match (body.rank, body.percentile) {
        (Some(rank), None) => {
            if rank == 0 {
                return Err(ApiError::BadRequest("Rank must be at least 1".into()));
            }
            rank
        }
        (None, Some(percentile)) => rank_from_percentile(percentile)?,
        _ => {
            return Err(ApiError::BadRequest(
                "Provide exactly one of rank and percentile".into(),
            ));
        }
    };

    if body.home_state.trim().is_empty() {
        return Err(ApiError::BadRequest("Home state is required".into()));
    }

    let profile = CandidateProfile {
        rank,
        category_rank: body.category_rank,
        category: body.category,
        gender: body.gender,
        home_state: body.home_state.trim().to_string(),
        pwd: body.pwd,
        exam: body.exam,
    };

    // Union the rows from every planned query; grouping de-duplicates rows
    // matched by more than one.
    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for query in query_plan(&profile) {
        for row in state.store.query_cutoffs(&query)? {
            if seen.insert(row.id) {
                rows.push(row);
            }
        }
    }

    let results = group_results(rows, &profile);
    let prediction = Prediction::new(auth.user_id, profile, body.percentile, results);

    let tx = CreditTransaction::prediction(auth.user_id, PREDICTION_COST_CREDITS, 0);
    let balance = state.store.record_prediction(&prediction, &tx)?;

    tracing::info!(
        user_id = %auth.user_id,
        prediction_id = %prediction.id,
        rank,
        matches = prediction.match_count(),
        new_balance = balance,
        "Prediction recorded"
    );

    Ok(Json(PredictResponse {
        prediction_id: prediction.id.to_string(),
        rank,
        results: prediction.results,
        balance,
        cost: PREDICTION_COST_CREDITS,
    }))
}

/// Pagination query for prediction history.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum entries to return (default 20, capped at 100).
    pub limit: Option<usize>,
    /// Entries to skip.
    pub offset: Option<usize>,
}

/// One entry in the prediction history listing.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    /// Snapshot id.
    pub prediction_id: String,
    /// The rank the prediction ran against.
    pub rank: u64,
    /// Percentile input, when used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    /// Number of department matches.
    pub matches: usize,
    /// Creation timestamp.
    pub created_at: String,
}

/// History response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Entries, newest first.
    pub predictions: Vec<HistoryEntry>,
}

/// List the current user's prediction history, newest first.
pub async fn list_predictions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = query.limit.unwrap_or(20).min(100);
    let offset = query.offset.unwrap_or(0);

    let predictions = state
        .store
        .list_predictions_by_user(&auth.user_id, limit, offset)?;

    let entries = predictions
        .iter()
        .map(|p| HistoryEntry {
            prediction_id: p.id.to_string(),
            rank: p.profile.rank,
            percentile: p.percentile,
            matches: p.match_count(),
            created_at: p.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(HistoryResponse {
        predictions: entries,
    }))
}

/// Full stored snapshot response.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    /// Snapshot id.
    pub prediction_id: String,
    /// The profile the prediction ran against.
    pub profile: CandidateProfile,
    /// Percentile input, when used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    /// Grouped results.
    pub results: Vec<InstitutePrediction>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Retrieve one stored prediction snapshot (no re-charge).
pub async fn get_prediction(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SnapshotResponse>, ApiError> {
    let prediction_id: PredictionId = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid prediction id".into()))?;

    let prediction = state
        .store
        .get_prediction(&prediction_id)?
        .filter(|p| p.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Prediction not found".into()))?;

    Ok(Json(SnapshotResponse {
        prediction_id: prediction.id.to_string(),
        profile: prediction.profile,
        percentile: prediction.percentile,
        results: prediction.results,
        created_at: prediction.created_at.to_rfc3339(),
    }))
}
