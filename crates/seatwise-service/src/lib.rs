//! Seatwise HTTP API service.
//!
//! This crate provides the HTTP API for the seatwise platform, including:
//!
//! - User registration and session tokens
//! - Prediction runs and history
//! - Credit balance and transactions
//! - Saved-department shortlists
//! - Razorpay order creation/verification and manual payment reconciliation
//! - Calendly webhook billing for mentorship sessions
//!
//! # Authentication
//!
//! End users authenticate with an HS256 session token issued at register or
//! login. Admin endpoints accept either a session token carrying the admin
//! role or the configured `X-Admin-Key` header for ops tooling.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Some handlers need async only for routing

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod razorpay;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use razorpay::{RazorpayClient, RazorpayError};
pub use routes::create_router;
pub use state::AppState;
