//! Core error types.

use thiserror::Error;

/// Errors produced by the core domain types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A percentile outside the valid `[0, 100]` range.
    #[error("percentile out of range: {0}")]
    InvalidPercentile(f64),

    /// A malformed identifier.
    #[error(transparent)]
    Id(#[from] crate::ids::IdError),

    /// A credit amount that must be positive was zero or negative.
    #[error("credit amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    /// An unrecognised enum label in external input.
    #[error("unknown {field}: {value}")]
    UnknownLabel {
        /// Which field carried the bad label.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A cutoff row whose closing rank precedes its opening rank.
    #[error("closing rank {closing} precedes opening rank {opening}")]
    InvalidRankRange {
        /// Opening rank.
        opening: u64,
        /// Closing rank.
        closing: u64,
    },
}

/// Convenience alias for core results.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
