//! Credit balance, ledger, and admin grant handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use seatwise_core::{CreditTransaction, TransactionType, UserId};
use seatwise_store::Store;

use crate::auth::{AdminAuth, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

/// Balance response.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Current credit balance.
    pub credits: i64,
    /// Lifetime recharged credits.
    pub lifetime_recharged: i64,
    /// Lifetime spent credits.
    pub lifetime_spent: i64,
}

/// Get the current user's balance.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(BalanceResponse {
        credits: user.credits,
        lifetime_recharged: user.lifetime_recharged,
        lifetime_spent: user.lifetime_spent,
    }))
}

/// Pagination query for the ledger listing.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    /// Maximum entries to return (default 50, capped at 200).
    pub limit: Option<usize>,
    /// Entries to skip.
    pub offset: Option<usize>,
}

/// One ledger entry in the listing.
#[derive(Debug, Serialize)]
pub struct LedgerEntry {
    /// Transaction id.
    pub transaction_id: String,
    /// Signed credit amount.
    pub amount: i64,
    /// Transaction type.
    pub transaction_type: TransactionType,
    /// Balance after the transaction.
    pub balance_after: i64,
    /// Human-readable description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Ledger response.
#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    /// Entries, newest first.
    pub transactions: Vec<LedgerEntry>,
}

/// List the current user's credit transactions, newest first.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<LedgerResponse>, ApiError> {
    let limit = query.limit.unwrap_or(50).min(200);
    let offset = query.offset.unwrap_or(0);

    let transactions = state
        .store
        .list_transactions_by_user(&auth.user_id, limit, offset)?;

    let entries = transactions
        .iter()
        .map(|tx| LedgerEntry {
            transaction_id: tx.id.to_string(),
            amount: tx.amount,
            transaction_type: tx.transaction_type,
            balance_after: tx.balance_after,
            description: tx.description.clone(),
            created_at: tx.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(LedgerResponse {
        transactions: entries,
    }))
}

/// Admin credit grant request.
#[derive(Debug, Deserialize)]
pub struct AdminGrantRequest {
    /// Target user.
    pub user_id: String,
    /// Credits to grant (positive).
    pub amount: i64,
    /// Reason, recorded in the ledger.
    pub reason: String,
}

/// Admin grant response.
#[derive(Debug, Serialize)]
pub struct AdminGrantResponse {
    /// The target user's new balance.
    pub balance: i64,
    /// Transaction id of the grant.
    pub transaction_id: String,
}

/// Grant credits to a user (admin only).
pub async fn admin_grant(
    State(state): State<Arc<AppState>>,
    admin: AdminAuth,
    Json(body): Json<AdminGrantRequest>,
) -> Result<Json<AdminGrantResponse>, ApiError> {
    let user_id: UserId = body
        .user_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid user id".into()))?;

    if body.amount <= 0 {
        return Err(ApiError::BadRequest("Amount must be positive".into()));
    }

    let tx = CreditTransaction::admin_grant(user_id, body.amount, 0, body.reason);
    let balance = state.store.grant_credits(&user_id, &tx)?;

    tracing::info!(
        admin_id = %admin.admin_id,
        user_id = %user_id,
        amount = body.amount,
        new_balance = balance,
        "Admin credit grant"
    );

    Ok(Json(AdminGrantResponse {
        balance,
        transaction_id: tx.id.to_string(),
    }))
}
