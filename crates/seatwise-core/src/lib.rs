//! Core types and decision logic for seatwise.
//!
//! This crate provides the foundational types used throughout the seatwise
//! platform:
//!
//! - **Identifiers**: `UserId`, `CutoffId`, `TransactionId`, `PredictionId`
//! - **Users**: `User` accounts with a credit balance
//! - **Credits**: `CreditTransaction`, `TransactionType`
//! - **Candidates**: `CandidateProfile`, category/quota/seat-type enums
//! - **Cutoffs**: `CutoffRow` reference records
//! - **Predictor**: rank conversion, query planning, chance classification
//! - **Payments**: `PaymentOrder` lifecycle records
//!
//! # Credit unit
//!
//! Credits are whole units stored as `i64`. A prediction costs
//! [`PREDICTION_COST_CREDITS`] credits; new accounts start with
//! [`SIGNUP_BONUS_CREDITS`]. All balance math is integer arithmetic.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod candidate;
pub mod contact;
pub mod credits;
pub mod cutoff;
pub mod error;
pub mod ids;
pub mod payment;
pub mod prediction;
pub mod predictor;
pub mod saved;
pub mod user;

pub use candidate::{
    CandidateProfile, Category, ExamType, Gender, InstituteType, Quota, SeatGender,
};
pub use contact::ContactSubmission;
pub use credits::{CreditTransaction, TransactionType};
pub use cutoff::CutoffRow;
pub use error::{CoreError, Result};
pub use ids::{CutoffId, IdError, PredictionId, TransactionId, UserId};
pub use payment::{PaymentOrder, PaymentProvider, PaymentStatus};
pub use prediction::{DepartmentPrediction, InstitutePrediction, Prediction};
pub use predictor::{
    chance, group_results, query_plan, rank_from_percentile, row_matches, Chance, CutoffQuery,
};
pub use saved::SavedDepartment;
pub use user::{
    User, COLLEGE_DETAIL_COST_CREDITS, PREDICTION_COST_CREDITS, SESSION_BOOKING_COST_CREDITS,
    SIGNUP_BONUS_CREDITS, TOTAL_CANDIDATES,
};
