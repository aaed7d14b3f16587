//! Stored prediction snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidate::{CandidateProfile, Quota, SeatGender};
use crate::ids::{PredictionId, UserId};
use crate::predictor::Chance;

/// One department-level match inside a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentPrediction {
    /// Department / branch name.
    pub department: String,

    /// Quota of the matched seat.
    pub quota: Quota,

    /// Seat-type label of the matched seat.
    pub seat_type: String,

    /// Gender pool of the matched seat.
    pub seat_gender: SeatGender,

    /// Opening rank of the cutoff row.
    pub opening_rank: u64,

    /// Closing rank of the cutoff row.
    pub closing_rank: u64,

    /// Classified admission chance.
    pub chance: Chance,
}

/// All matched departments for one institute, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutePrediction {
    /// Institute name.
    pub institute: String,

    /// Numeric ranking used for ordering; institutes without one sort last.
    pub institute_ranking: Option<u32>,

    /// Matched departments, sorted by (department, seat gender, quota).
    pub departments: Vec<DepartmentPrediction>,
}

/// A complete prediction run, stored as an immutable snapshot.
///
/// Snapshots capture the inputs and the full result set so a user can
/// revisit a past prediction without re-running (and re-paying for) it,
/// even after the cutoff tables change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// ULID identifier; lexicographic order is creation order.
    pub id: PredictionId,

    /// Owner.
    pub user_id: UserId,

    /// The profile the prediction ran against.
    pub profile: CandidateProfile,

    /// Percentile input, when the rank was derived from one.
    pub percentile: Option<f64>,

    /// Grouped results, in display order.
    pub results: Vec<InstitutePrediction>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Prediction {
    /// Create a snapshot for a just-computed prediction.
    #[must_use]
    pub fn new(
        user_id: UserId,
        profile: CandidateProfile,
        percentile: Option<f64>,
        results: Vec<InstitutePrediction>,
    ) -> Self {
        Self {
            id: PredictionId::generate(),
            user_id,
            profile,
            percentile,
            results,
            created_at: Utc::now(),
        }
    }

    /// Total number of department matches across all institutes.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.results.iter().map(|i| i.departments.len()).sum()
    }
}
