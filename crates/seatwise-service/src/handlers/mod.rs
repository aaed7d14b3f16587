//! API handlers.

pub mod colleges;
pub mod contact;
pub mod credits;
pub mod cutoffs;
pub mod departments;
pub mod health;
pub mod payments;
pub mod predictions;
pub mod users;
pub mod webhooks;
