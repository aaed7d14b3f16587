//! Eligibility prediction logic.
//!
//! Pure decision logic: converting percentiles to ranks, planning the
//! cutoff queries a candidate profile needs, classifying admission chances,
//! and grouping the unioned result rows by institute. Executing the
//! queries against stored cutoff data is the store's job; everything here
//! is deterministic and side-effect free.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::candidate::{CandidateProfile, Category, ExamType, InstituteType, Quota};
use crate::cutoff::CutoffRow;
use crate::error::CoreError;
use crate::prediction::{DepartmentPrediction, InstitutePrediction};
use crate::user::TOTAL_CANDIDATES;

// ============================================================================
// Percentile conversion
// ============================================================================

/// Convert a percentile to an approximate rank.
///
/// Linear transform `round((100 - p) * TOTAL_CANDIDATES / 100)`, clamped to
/// a minimum rank of 1. An approximation against a fixed candidate
/// population, not a statistical model.
///
/// # Errors
///
/// Returns [`CoreError::InvalidPercentile`] when `percentile` is outside
/// `[0, 100]` or not finite.
pub fn rank_from_percentile(percentile: f64) -> Result<u64, CoreError> {
    if !percentile.is_finite() || !(0.0..=100.0).contains(&percentile) {
        return Err(CoreError::InvalidPercentile(percentile));
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rank = ((100.0 - percentile) * (TOTAL_CANDIDATES as f64 / 100.0)).round() as u64;

    Ok(rank.max(1))
}

// ============================================================================
// Query planning
// ============================================================================

/// One cutoff query the predictor issues.
///
/// Eligibility predicate: a row matches when its seat type, quota, and
/// institute restrictions match and `closing_rank >= rank`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffQuery {
    /// Seat-type label to match.
    pub seat_type: String,

    /// Quota to match.
    pub quota: Quota,

    /// Home state the institute must belong to (home-state quota only).
    pub home_state: Option<String>,

    /// Restrict to one institute type (Advanced restricts to IITs).
    pub institute_type: Option<InstituteType>,

    /// The applicable rank: rows with `closing_rank >= rank` are eligible.
    pub rank: u64,
}

/// Build the set of cutoff queries for a candidate profile.
///
/// - One OPEN query against the all-India quota with the general rank.
/// - One OPEN query against the home-state quota (skipped for Advanced,
///   which has no home-state quota).
/// - When the category seat type differs from OPEN (non-General category
///   or PwD), the same pair again with the category seat type, using the
///   category rank when supplied and falling back to the general rank
///   otherwise.
#[must_use]
pub fn query_plan(profile: &CandidateProfile) -> Vec<CutoffQuery> {
    let institute_type = match profile.exam {
        ExamType::Advanced => Some(InstituteType::Iit),
        ExamType::Main => None,
    };

    let mut queries = vec![CutoffQuery {
        seat_type: Category::General.seat_type(false).to_string(),
        quota: Quota::AllIndia,
        home_state: None,
        institute_type,
        rank: profile.rank,
    }];

    if profile.exam == ExamType::Main {
        queries.push(CutoffQuery {
            seat_type: Category::General.seat_type(false).to_string(),
            quota: Quota::HomeState,
            home_state: Some(profile.home_state.clone()),
            institute_type,
            rank: profile.rank,
        });
    }

    let category_seat = profile.category.seat_type(profile.pwd);
    if category_seat != Category::General.seat_type(false) {
        let category_rank = profile.category_rank.unwrap_or(profile.rank);

        queries.push(CutoffQuery {
            seat_type: category_seat.to_string(),
            quota: Quota::AllIndia,
            home_state: None,
            institute_type,
            rank: category_rank,
        });

        if profile.exam == ExamType::Main {
            queries.push(CutoffQuery {
                seat_type: category_seat.to_string(),
                quota: Quota::HomeState,
                home_state: Some(profile.home_state.clone()),
                institute_type,
                rank: category_rank,
            });
        }
    }

    queries
}

/// Whether a cutoff row satisfies a query's predicates.
#[must_use]
pub fn row_matches(row: &CutoffRow, query: &CutoffQuery) -> bool {
    if row.seat_type != query.seat_type || row.quota != query.quota {
        return false;
    }
    if let Some(state) = &query.home_state {
        if !row.institute_state.eq_ignore_ascii_case(state) {
            return false;
        }
    }
    if let Some(institute_type) = query.institute_type {
        if row.institute_type != institute_type {
            return false;
        }
    }
    row.closing_rank >= query.rank
}

// ============================================================================
// Chance classification
// ============================================================================

/// Admission chance for one department row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chance {
    /// Rank at or inside the closing rank.
    High,
    /// Rank outside the tolerance band past the closing rank.
    Medium,
    /// Rank just past the closing rank (borderline).
    Low,
}

/// Tolerance band width for borderline classification.
///
/// Tight cutoffs get tight bands: 5 ranks when the closing rank is at most
/// 100, 15 up to 1000, 30 beyond.
#[must_use]
pub const fn chance_margin(closing_rank: u64) -> u64 {
    if closing_rank <= 100 {
        5
    } else if closing_rank <= 1000 {
        15
    } else {
        30
    }
}

/// Classify the admission chance of one rank against one cutoff row.
#[must_use]
pub fn chance(rank: u64, _opening_rank: u64, closing_rank: u64) -> Chance {
    if rank <= closing_rank {
        Chance::High
    } else if rank <= closing_rank + chance_margin(closing_rank) {
        Chance::Low
    } else {
        Chance::Medium
    }
}

// ============================================================================
// Grouping and ordering
// ============================================================================

/// Union, de-duplicate, classify, and group matched rows by institute.
///
/// Rows are de-duplicated by cutoff id (a row can match more than one
/// query), classified using the category rank when the row is
/// category-specific and a category rank exists, then grouped by institute
/// name. Department entries sort by (department, seat gender, quota);
/// institutes sort by their numeric ranking ascending with missing
/// rankings last, ties broken by name.
#[must_use]
pub fn group_results(rows: Vec<CutoffRow>, profile: &CandidateProfile) -> Vec<InstitutePrediction> {
    let open_seat = Category::General.seat_type(false);

    let mut by_institute: BTreeMap<String, (Option<u32>, Vec<DepartmentPrediction>)> =
        BTreeMap::new();
    let mut seen = std::collections::HashSet::new();

    for row in rows {
        if !seen.insert(row.id) {
            continue;
        }

        let applicable_rank = if row.seat_type == open_seat {
            profile.rank
        } else {
            profile.category_rank.unwrap_or(profile.rank)
        };

        let entry = by_institute
            .entry(row.institute.clone())
            .or_insert_with(|| (row.institute_ranking, Vec::new()));

        // Keep the best (lowest) ranking seen for the institute.
        entry.0 = match (entry.0, row.institute_ranking) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        entry.1.push(DepartmentPrediction {
            department: row.department.clone(),
            quota: row.quota,
            seat_type: row.seat_type.clone(),
            seat_gender: row.seat_gender,
            opening_rank: row.opening_rank,
            closing_rank: row.closing_rank,
            chance: chance(applicable_rank, row.opening_rank, row.closing_rank),
        });
    }

    let mut institutes: Vec<InstitutePrediction> = by_institute
        .into_iter()
        .map(|(institute, (ranking, mut departments))| {
            departments.sort_by(|a, b| {
                a.department
                    .cmp(&b.department)
                    .then(a.seat_gender.cmp(&b.seat_gender))
                    .then(a.quota.cmp(&b.quota))
            });
            InstitutePrediction {
                institute,
                institute_ranking: ranking,
                departments,
            }
        })
        .collect();

    institutes.sort_by(|a, b| {
        match (a.institute_ranking, b.institute_ranking) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| a.institute.cmp(&b.institute))
    });

    institutes
}
