//! Payment handlers: Razorpay orders, verification, and manual
//! reconciliation.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use seatwise_core::{CreditTransaction, PaymentOrder, PaymentProvider, PaymentStatus};
use seatwise_store::Store;

use crate::auth::{AdminAuth, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Constants
// ============================================================================

/// Price of one credit in paise (INR 10).
pub const CREDIT_PRICE_PAISE: u64 = 1_000;

/// Largest credit purchase accepted in one order.
const MAX_CREDITS_PER_ORDER: i64 = 10_000;

fn validate_credits(credits: i64) -> Result<u64, ApiError> {
    if credits <= 0 {
        return Err(ApiError::BadRequest("Credits must be positive".into()));
    }
    if credits > MAX_CREDITS_PER_ORDER {
        return Err(ApiError::BadRequest(format!(
            "At most {MAX_CREDITS_PER_ORDER} credits per order"
        )));
    }
    #[allow(clippy::cast_sign_loss)]
    Ok(credits as u64 * CREDIT_PRICE_PAISE)
}

// ============================================================================
// Gateway orders
// ============================================================================

/// Order creation request.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Credits to purchase.
    pub credits: i64,
}

/// Order creation response, consumed by the checkout widget.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    /// Gateway order id.
    pub order_id: String,
    /// Amount in paise.
    pub amount_paise: u64,
    /// Currency code.
    pub currency: String,
    /// Public key id for the checkout widget.
    pub key_id: String,
}

/// Create a Razorpay order for a credit purchase.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let amount_paise = validate_credits(body.credits)?;

    let razorpay = state
        .razorpay
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payments are not configured".into()))?;

    let receipt = format!("sw_{}", auth.user_id);
    let gateway_order = razorpay
        .create_order(amount_paise, &receipt)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %auth.user_id, "Razorpay order creation failed");
            ApiError::ExternalService("Payment gateway error".into())
        })?;

    let order = PaymentOrder::gateway(
        gateway_order.id.clone(),
        auth.user_id,
        amount_paise,
        body.credits,
    );
    state.store.put_payment_order(&order)?;

    tracing::info!(
        user_id = %auth.user_id,
        order_id = %order.order_id,
        credits = body.credits,
        amount_paise,
        "Payment order created"
    );

    Ok(Json(CreateOrderResponse {
        order_id: order.order_id,
        amount_paise,
        currency: gateway_order.currency,
        key_id: razorpay.key_id().to_string(),
    }))
}

/// Verification request from the checkout callback.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    /// Our order id.
    pub order_id: String,
    /// Gateway payment id.
    pub payment_id: String,
    /// Gateway signature over `order_id|payment_id`.
    pub signature: String,
}

/// Verification response.
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    /// Balance after the grant.
    pub balance: i64,
    /// Credits granted.
    pub credits: i64,
}

/// Verify a checkout payment and grant the purchased credits.
///
/// The grant is keyed by the gateway payment id, so replaying a completed
/// checkout returns 409 and never double-credits.
pub async fn verify_payment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let razorpay = state
        .razorpay
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("Payments are not configured".into()))?;

    let mut order = state
        .store
        .get_payment_order(&body.order_id)?
        .filter(|o| o.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Order not found".into()))?;

    if order.status != PaymentStatus::Pending {
        return Err(ApiError::Conflict("Order is not pending".into()));
    }

    razorpay
        .verify_payment_signature(&body.order_id, &body.payment_id, &body.signature)
        .map_err(|_| {
            tracing::warn!(
                user_id = %auth.user_id,
                order_id = %body.order_id,
                "Invalid payment signature"
            );
            ApiError::Unauthorized
        })?;

    order.complete(body.payment_id.clone());

    let tx = CreditTransaction::recharge(
        auth.user_id,
        order.credits,
        0,
        body.payment_id.clone(),
        format!("Recharge: {} credits", order.credits),
    );
    let balance =
        state
            .store
            .grant_credits_for_payment(&auth.user_id, &body.payment_id, &tx, Some(&order))?;

    tracing::info!(
        user_id = %auth.user_id,
        order_id = %order.order_id,
        payment_id = %body.payment_id,
        credits = order.credits,
        new_balance = balance,
        "Payment verified and credited"
    );

    Ok(Json(VerifyPaymentResponse {
        balance,
        credits: order.credits,
    }))
}

// ============================================================================
// Manual (UPI) path
// ============================================================================

/// Manual payment submission.
#[derive(Debug, Deserialize)]
pub struct ManualPaymentRequest {
    /// The UPI transaction id the user claims to have paid with.
    pub transaction_id: String,
    /// Credits the payment covers.
    pub credits: i64,
}

/// Manual payment response.
#[derive(Debug, Serialize)]
pub struct ManualPaymentResponse {
    /// Our order id for tracking.
    pub order_id: String,
    /// Order status (always pending until an admin approves).
    pub status: PaymentStatus,
}

/// Record a manual UPI payment awaiting admin approval.
pub async fn submit_manual_payment(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<ManualPaymentRequest>,
) -> Result<Json<ManualPaymentResponse>, ApiError> {
    let amount_paise = validate_credits(body.credits)?;

    let transaction_id = body.transaction_id.trim().to_string();
    if transaction_id.is_empty() {
        return Err(ApiError::BadRequest("Transaction id is required".into()));
    }

    // A reference that was already credited cannot be resubmitted.
    if state.store.has_payment_ref(&transaction_id)? {
        return Err(ApiError::DuplicatePayment(transaction_id));
    }

    let order = PaymentOrder::manual(auth.user_id, transaction_id, amount_paise, body.credits);
    state.store.put_payment_order(&order)?;

    tracing::info!(
        user_id = %auth.user_id,
        order_id = %order.order_id,
        credits = body.credits,
        "Manual payment submitted"
    );

    Ok(Json(ManualPaymentResponse {
        order_id: order.order_id,
        status: PaymentStatus::Pending,
    }))
}

// ============================================================================
// Admin reconciliation
// ============================================================================

/// One pending order in the admin view.
#[derive(Debug, Serialize)]
pub struct PendingOrder {
    /// Order id.
    pub order_id: String,
    /// Purchasing user.
    pub user_id: String,
    /// Payment channel.
    pub provider: PaymentProvider,
    /// Amount in paise.
    pub amount_paise: u64,
    /// Credits to grant on approval.
    pub credits: i64,
    /// Submitted external reference, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_ref: Option<String>,
    /// Submission timestamp.
    pub created_at: String,
}

/// Pending orders response.
#[derive(Debug, Serialize)]
pub struct PendingOrdersResponse {
    /// Pending orders, oldest first.
    pub orders: Vec<PendingOrder>,
}

/// List pending payment orders (admin only).
pub async fn list_pending(
    State(state): State<Arc<AppState>>,
    _admin: AdminAuth,
) -> Result<Json<PendingOrdersResponse>, ApiError> {
    let orders = state
        .store
        .list_pending_payment_orders()?
        .into_iter()
        .map(|o| PendingOrder {
            order_id: o.order_id,
            user_id: o.user_id.to_string(),
            provider: o.provider,
            amount_paise: o.amount_paise,
            credits: o.credits,
            payment_ref: o.payment_ref,
            created_at: o.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(PendingOrdersResponse { orders }))
}

/// Approval request.
#[derive(Debug, Deserialize)]
pub struct ApprovePaymentRequest {
    /// Order to approve.
    pub order_id: String,
}

/// Approval response.
#[derive(Debug, Serialize)]
pub struct ApprovePaymentResponse {
    /// The user's balance after the grant.
    pub balance: i64,
    /// Credits granted.
    pub credits: i64,
}

/// Approve a pending manual payment and grant its credits (admin only).
///
/// Uses the same grant primitive as gateway verification, keyed by the
/// submitted transaction id, so an order cannot be approved twice.
pub async fn approve_payment(
    State(state): State<Arc<AppState>>,
    admin: AdminAuth,
    Json(body): Json<ApprovePaymentRequest>,
) -> Result<Json<ApprovePaymentResponse>, ApiError> {
    let mut order = state
        .store
        .get_payment_order(&body.order_id)?
        .ok_or_else(|| ApiError::NotFound("Order not found".into()))?;

    if order.status != PaymentStatus::Pending {
        return Err(ApiError::Conflict("Order is not pending".into()));
    }

    let payment_ref = order
        .payment_ref
        .clone()
        .ok_or_else(|| ApiError::BadRequest("Order has no payment reference".into()))?;

    order.complete(payment_ref.clone());

    let tx = CreditTransaction::recharge(
        order.user_id,
        order.credits,
        0,
        payment_ref.clone(),
        format!("Recharge: {} credits (manual)", order.credits),
    );
    let balance =
        state
            .store
            .grant_credits_for_payment(&order.user_id, &payment_ref, &tx, Some(&order))?;

    tracing::info!(
        admin_id = %admin.admin_id,
        order_id = %order.order_id,
        user_id = %order.user_id,
        credits = order.credits,
        new_balance = balance,
        "Manual payment approved"
    );

    Ok(Json(ApprovePaymentResponse {
        balance,
        credits: order.credits,
    }))
}
