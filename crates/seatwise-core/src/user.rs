//! User account types for seatwise.
//!
//! A user carries identity, the demographic attributes the predictor needs,
//! and a mutable integer credit balance. All balance changes go through the
//! store's atomic operations; nothing in this module mutates balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::candidate::{Category, Gender};
use crate::UserId;

// ============================================================================
// Constants
// ============================================================================

/// Credits granted to every new account at registration.
pub const SIGNUP_BONUS_CREDITS: i64 = 15;

/// Cost of one eligibility prediction.
pub const PREDICTION_COST_CREDITS: i64 = 10;

/// Cost of opening one college detail page.
pub const COLLEGE_DETAIL_COST_CREDITS: i64 = 2;

/// Cost of one mentorship session booking (deducted by the scheduling
/// webhook).
pub const SESSION_BOOKING_COST_CREDITS: i64 = 50;

/// Candidate population used for the percentile-to-rank approximation.
pub const TOTAL_CANDIDATES: u64 = 1_300_000;

/// A seatwise user account.
///
/// The email+mobile pair functions as the login credential; demographic
/// attributes seed the predictor's defaults. Accounts are never hard-deleted
/// by user-facing flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID.
    pub user_id: UserId,

    /// Display name.
    pub name: String,

    /// Email address (unique; half of the login credential).
    pub email: String,

    /// Mobile number (other half of the login credential).
    pub mobile: String,

    /// Candidate gender.
    pub gender: Gender,

    /// Reservation category.
    pub category: Category,

    /// Home state for home-state quota matching.
    pub home_state: String,

    /// Current credit balance.
    pub credits: i64,

    /// Lifetime credits added through recharges and grants.
    pub lifetime_recharged: i64,

    /// Lifetime credits spent on paid features.
    pub lifetime_spent: i64,

    /// When the account was created.
    pub created_at: DateTime<Utc>,

    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with the signup credit grant.
    #[must_use]
    pub fn new(
        user_id: UserId,
        name: String,
        email: String,
        mobile: String,
        gender: Gender,
        category: Category,
        home_state: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            name,
            email,
            mobile,
            gender,
            category,
            home_state,
            credits: SIGNUP_BONUS_CREDITS,
            lifetime_recharged: SIGNUP_BONUS_CREDITS,
            lifetime_spent: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the balance covers a given cost.
    #[must_use]
    pub fn has_sufficient_credits(&self, cost: i64) -> bool {
        self.credits >= cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            UserId::generate(),
            "Asha Rao".into(),
            "asha@example.com".into(),
            "9876543210".into(),
            Gender::Female,
            Category::General,
            "Karnataka".into(),
        )
    }

    #[test]
    fn new_user_gets_signup_bonus() {
        let user = test_user();
        assert_eq!(user.credits, SIGNUP_BONUS_CREDITS);
        assert_eq!(user.lifetime_recharged, SIGNUP_BONUS_CREDITS);
        assert_eq!(user.lifetime_spent, 0);
    }

    #[test]
    fn sufficient_credits_boundary() {
        let mut user = test_user();
        user.credits = 10;

        assert!(user.has_sufficient_credits(9));
        assert!(user.has_sufficient_credits(10));
        assert!(!user.has_sufficient_credits(11));
    }

    #[test]
    fn signup_bonus_covers_one_prediction() {
        let user = test_user();
        assert!(user.has_sufficient_credits(PREDICTION_COST_CREDITS));
    }
}
