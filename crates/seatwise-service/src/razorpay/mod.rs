//! Razorpay integration: order creation and payment signature checks.

pub mod client;
pub mod types;

pub use client::{RazorpayClient, RazorpayError};
pub use types::{Order, RazorpayErrorResponse};
