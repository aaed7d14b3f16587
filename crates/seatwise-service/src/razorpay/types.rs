//! Razorpay API types.

use serde::{Deserialize, Serialize};

/// A Razorpay order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Order id (`order_...`).
    pub id: String,
    /// Amount in paise.
    pub amount: u64,
    /// Currency code.
    pub currency: String,
    /// Our receipt reference.
    pub receipt: Option<String>,
    /// Order status reported by the gateway.
    pub status: String,
}

/// Error envelope returned by the Razorpay API.
#[derive(Debug, Deserialize)]
pub struct RazorpayErrorResponse {
    /// Error detail.
    pub error: RazorpayErrorBody,
}

/// Error detail body.
#[derive(Debug, Deserialize)]
pub struct RazorpayErrorBody {
    /// Error code (e.g. `BAD_REQUEST_ERROR`).
    pub code: String,
    /// Human-readable description.
    pub description: String,
}
