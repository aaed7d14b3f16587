//! Cutoff reference records.
//!
//! Cutoff rows describe one (institute, department, quota, seat type,
//! gender, year, round) combination's opening and closing rank. They are
//! imported from published counseling data and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::candidate::{InstituteType, Quota, SeatGender};
use crate::CutoffId;

/// One counseling cutoff record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffRow {
    /// Row identifier.
    pub id: CutoffId,

    /// Institute display name.
    pub institute: String,

    /// Institute classification.
    pub institute_type: InstituteType,

    /// State the institute belongs to (for home-state quota matching).
    pub institute_state: String,

    /// Department / academic program name.
    pub department: String,

    /// Seat quota.
    pub quota: Quota,

    /// Seat-type label (e.g. `OPEN`, `OBC-NCL (PwD)`).
    pub seat_type: String,

    /// Seat gender pool.
    pub seat_gender: SeatGender,

    /// Opening rank for this combination.
    pub opening_rank: u64,

    /// Closing rank for this combination.
    pub closing_rank: u64,

    /// Academic year the data belongs to.
    pub year: u16,

    /// Counseling round.
    pub round: u8,

    /// Soft priority for ordering institutes in results (e.g. an NIRF
    /// position). Missing values sort last.
    pub institute_ranking: Option<u32>,
}
