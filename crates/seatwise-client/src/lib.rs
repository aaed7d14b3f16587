//! Seatwise Client SDK.
//!
//! This crate provides a client library for frontends and scripts to talk to
//! the seatwise API.
//!
//! # Example
//!
//! ```no_run
//! use seatwise_client::{PredictRequest, SeatwiseClient};
//! use seatwise_core::{Category, ExamType, Gender};
//!
//! # async fn example() -> Result<(), seatwise_client::ClientError> {
//! let client = SeatwiseClient::new("http://localhost:8080", "session-token");
//!
//! // Run a prediction against a JEE Main rank
//! let response = client.predict(PredictRequest {
//!     rank: Some(12_000),
//!     percentile: None,
//!     category_rank: None,
//!     category: Category::General,
//!     gender: Gender::Female,
//!     home_state: "Kerala".to_string(),
//!     pwd: false,
//!     exam: ExamType::Main,
//! }).await?;
//!
//! println!("{} institutes, {} credits left", response.results.len(), response.balance);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, SeatwiseClient};
pub use error::ClientError;
pub use types::{
    BalanceResponse, CreateOrderRequest, CreateOrderResponse, PredictRequest, PredictResponse,
    VerifyPaymentRequest, VerifyPaymentResponse,
};
