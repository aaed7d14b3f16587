//! Request and response types for the seatwise client.

use serde::{Deserialize, Serialize};

use seatwise_core::{Category, ExamType, Gender, InstitutePrediction};

/// Prediction request. Set exactly one of `rank` and `percentile`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    /// Exam rank, when known directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u64>,
    /// Percentile, converted server-side to an approximate rank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    /// Category rank, when the candidate has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_rank: Option<u64>,
    /// Reservation category.
    pub category: Category,
    /// Gender.
    pub gender: Gender,
    /// Home state (for home-state quota queries).
    pub home_state: String,
    /// PwD status.
    pub pwd: bool,
    /// Which exam the rank belongs to.
    pub exam: ExamType,
}

/// Prediction response.
#[derive(Debug, Clone, Deserialize)]
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

/// Credit balance response.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    /// Current credit balance.
    pub credits: i64,
    /// Lifetime recharged credits.
    pub lifetime_recharged: i64,
    /// Lifetime spent credits.
    pub lifetime_spent: i64,
}

/// Order creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    /// Credits to purchase.
    pub credits: i64,
}

/// Order creation response, consumed by the checkout widget.
#[derive(Debug, Clone, Deserialize)]
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

/// Payment verification request.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentRequest {
    /// Our order id.
    pub order_id: String,
    /// Gateway payment id.
    pub payment_id: String,
    /// Gateway signature over `order_id|payment_id`.
    pub signature: String,
}

/// Payment verification response.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentResponse {
    /// Balance after the grant.
    pub balance: i64,
    /// Credits granted.
    pub credits: i64,
}

/// Error envelope returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Inner error body of the envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
