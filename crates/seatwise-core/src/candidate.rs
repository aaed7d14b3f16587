//! Candidate attributes and seat classification enums.
//!
//! These enums mirror the labels used in published counseling cutoff data:
//! seat types like `OBC-NCL (PwD)`, quotas `AI`/`HS`/`OS`, and the
//! gender-neutral vs female-only seat pools.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reservation category of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// General (unreserved).
    General,
    /// Other Backward Classes (non-creamy layer).
    Obc,
    /// Scheduled Castes.
    Sc,
    /// Scheduled Tribes.
    St,
    /// Economically Weaker Sections.
    Ews,
}

impl Category {
    /// The cutoff seat-type label for this category and PwD status.
    ///
    /// The open pool is labelled `OPEN`; every other combination maps to
    /// its published label, e.g. `Obc` + PwD -> `OBC-NCL (PwD)`.
    #[must_use]
    pub const fn seat_type(&self, pwd: bool) -> &'static str {
        match (self, pwd) {
            (Self::General, false) => "OPEN",
            (Self::General, true) => "OPEN (PwD)",
            (Self::Obc, false) => "OBC-NCL",
            (Self::Obc, true) => "OBC-NCL (PwD)",
            (Self::Sc, false) => "SC",
            (Self::Sc, true) => "SC (PwD)",
            (Self::St, false) => "ST",
            (Self::St, true) => "ST (PwD)",
            (Self::Ews, false) => "EWS",
            (Self::Ews, true) => "EWS (PwD)",
        }
    }
}

/// Candidate gender (profile attribute, distinct from the seat pool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male candidate.
    Male,
    /// Female candidate.
    Female,
    /// Other / undisclosed.
    Other,
}

/// Seat gender pool on a cutoff row.
///
/// The derive order doubles as the display tie-break order: gender-neutral
/// seats sort before female-only seats within a department.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SeatGender {
    /// Open to all genders.
    GenderNeutral,
    /// Female-only (including supernumerary) seats.
    FemaleOnly,
}

impl SeatGender {
    /// Published label for this pool.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GenderNeutral => "Gender-Neutral",
            Self::FemaleOnly => "Female-only (including Supernumerary)",
        }
    }

    /// Parse a published label, accepting the common short forms.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownLabel` for an unrecognised label.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        match label.trim() {
            "Gender-Neutral" | "gender_neutral" => Ok(Self::GenderNeutral),
            "Female-only (including Supernumerary)" | "Female-only" | "female_only" => {
                Ok(Self::FemaleOnly)
            }
            other => Err(CoreError::UnknownLabel {
                field: "seat_gender",
                value: other.to_string(),
            }),
        }
    }
}

/// Seat quota on a cutoff row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Quota {
    /// All-India quota.
    AllIndia,
    /// Home-state quota.
    HomeState,
    /// Other-state quota.
    OtherState,
}

impl Quota {
    /// Published short code for this quota.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AllIndia => "AI",
            Self::HomeState => "HS",
            Self::OtherState => "OS",
        }
    }

    /// Parse a published short code.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownLabel` for an unrecognised code.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        match label.trim() {
            "AI" | "ai" => Ok(Self::AllIndia),
            "HS" | "hs" => Ok(Self::HomeState),
            "OS" | "os" => Ok(Self::OtherState),
            other => Err(CoreError::UnknownLabel {
                field: "quota",
                value: other.to_string(),
            }),
        }
    }
}

/// Which entrance exam the rank belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    /// JEE Main: NIT/IIIT/GFTI counseling, with home-state quotas.
    Main,
    /// JEE Advanced: IIT counseling only, no home-state quota.
    Advanced,
}

/// Institute classification on a cutoff row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstituteType {
    /// Indian Institute of Technology.
    Iit,
    /// National Institute of Technology.
    Nit,
    /// Indian Institute of Information Technology.
    Iiit,
    /// Government Funded Technical Institute.
    Gfti,
}

impl InstituteType {
    /// Parse a published classification label.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownLabel` for an unrecognised label.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        match label.trim().to_ascii_uppercase().as_str() {
            "IIT" => Ok(Self::Iit),
            "NIT" => Ok(Self::Nit),
            "IIIT" => Ok(Self::Iiit),
            "GFTI" => Ok(Self::Gfti),
            _ => Err(CoreError::UnknownLabel {
                field: "institute_type",
                value: label.trim().to_string(),
            }),
        }
    }
}

/// A candidate's prediction input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    /// General (CRL) rank.
    pub rank: u64,

    /// Category rank, when the candidate has one.
    ///
    /// When absent, category-seat queries fall back to the general rank;
    /// since the general rank is always numerically worse than or equal to
    /// the category rank, the fallback only under-reports eligibility.
    pub category_rank: Option<u64>,

    /// Reservation category.
    pub category: Category,

    /// Candidate gender.
    pub gender: Gender,

    /// Home state for home-state quota matching.
    pub home_state: String,

    /// Person-with-disability status.
    pub pwd: bool,

    /// Which exam the rank belongs to.
    pub exam: ExamType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_type_labels() {
        assert_eq!(Category::General.seat_type(false), "OPEN");
        assert_eq!(Category::General.seat_type(true), "OPEN (PwD)");
        assert_eq!(Category::Obc.seat_type(true), "OBC-NCL (PwD)");
        assert_eq!(Category::Sc.seat_type(false), "SC");
        assert_eq!(Category::Ews.seat_type(false), "EWS");
    }

    #[test]
    fn seat_gender_tie_break_order() {
        assert!(SeatGender::GenderNeutral < SeatGender::FemaleOnly);
    }

    #[test]
    fn quota_codes() {
        assert_eq!(Quota::AllIndia.as_str(), "AI");
        assert_eq!(Quota::HomeState.as_str(), "HS");
        assert_eq!(Quota::OtherState.as_str(), "OS");
    }

    #[test]
    fn labels_parse_back() {
        assert_eq!(Quota::parse("AI").unwrap(), Quota::AllIndia);
        assert_eq!(
            SeatGender::parse("Gender-Neutral").unwrap(),
            SeatGender::GenderNeutral
        );
        assert_eq!(InstituteType::parse("nit").unwrap(), InstituteType::Nit);
        assert!(Quota::parse("XX").is_err());
        assert!(InstituteType::parse("university").is_err());
    }
}
