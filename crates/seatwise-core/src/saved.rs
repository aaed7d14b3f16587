//! Saved department shortlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidate::{Quota, SeatGender};
use crate::ids::UserId;

/// One shortlisted department seat.
///
/// The storage key is derived deterministically from the identifying
/// tuple (user, institute, department, quota, seat gender, seat type),
/// so re-saving the same seat overwrites rather than duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDepartment {
    /// Owning user.
    pub user_id: UserId,

    /// Institute name.
    pub institute: String,

    /// Department / branch name.
    pub department: String,

    /// Quota of the saved seat.
    pub quota: Quota,

    /// Gender pool of the saved seat.
    pub seat_gender: SeatGender,

    /// Seat-type label of the saved seat.
    pub seat_type: String,

    /// The candidate's rank at save time, for later comparison.
    pub rank_at_save: u64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl SavedDepartment {
    /// The identifying tuple as stable strings, in key order.
    #[must_use]
    pub fn identity(&self) -> [&str; 5] {
        [
            &self.institute,
            &self.department,
            self.quota.as_str(),
            self.seat_gender.as_str(),
            &self.seat_type,
        ]
    }
}
