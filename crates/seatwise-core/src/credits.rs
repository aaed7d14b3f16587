//! Credit transaction types for seatwise.
//!
//! Every balance change writes a `CreditTransaction` row in the same atomic
//! batch as the balance mutation, so the ledger is authoritative: summing
//! `amount` over a user's transactions always reproduces their balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{TransactionId, UserId};

/// A credit transaction representing one balance change.
///
/// Transactions use ULIDs for time-ordered IDs, so listing a user's
/// transactions by key order yields chronological history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransaction {
    /// Unique transaction ID (ULID for time-ordering).
    pub id: TransactionId,

    /// The user whose balance was affected.
    pub user_id: UserId,

    /// Credit delta. Positive = grant, negative = deduction.
    pub amount: i64,

    /// Type of transaction.
    pub transaction_type: TransactionType,

    /// Balance after this transaction.
    pub balance_after: i64,

    /// Human-readable description.
    pub description: String,

    /// External payment reference (gateway payment id or manual
    /// transaction id), when the transaction was funded by a payment.
    pub payment_ref: Option<String>,

    /// When the transaction was created.
    pub created_at: DateTime<Utc>,
}

impl CreditTransaction {
    /// Create a recharge transaction funded by a verified payment.
    #[must_use]
    pub fn recharge(
        user_id: UserId,
        amount: i64,
        balance_after: i64,
        payment_ref: String,
        description: String,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount,
            transaction_type: TransactionType::Recharge,
            balance_after,
            description,
            payment_ref: Some(payment_ref),
            created_at: Utc::now(),
        }
    }

    /// Create a prediction deduction. The amount is always stored negative.
    #[must_use]
    pub fn prediction(user_id: UserId, amount: i64, balance_after: i64) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount: -amount.abs(),
            transaction_type: TransactionType::Prediction,
            balance_after,
            description: "College prediction".into(),
            payment_ref: None,
            created_at: Utc::now(),
        }
    }

    /// Create a college-detail-view deduction.
    #[must_use]
    pub fn college_view(
        user_id: UserId,
        amount: i64,
        balance_after: i64,
        institute: &str,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount: -amount.abs(),
            transaction_type: TransactionType::CollegeView,
            balance_after,
            description: format!("College details: {institute}"),
            payment_ref: None,
            created_at: Utc::now(),
        }
    }

    /// Create a session-booking deduction (scheduling webhook).
    #[must_use]
    pub fn session_booking(user_id: UserId, amount: i64, balance_after: i64) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount: -amount.abs(),
            transaction_type: TransactionType::SessionBooking,
            balance_after,
            description: "Mentorship session booking".into(),
            payment_ref: None,
            created_at: Utc::now(),
        }
    }

    /// Create an admin credit grant.
    #[must_use]
    pub fn admin_grant(user_id: UserId, amount: i64, balance_after: i64, reason: String) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount,
            transaction_type: TransactionType::AdminGrant,
            balance_after,
            description: reason,
            payment_ref: None,
            created_at: Utc::now(),
        }
    }

    /// Create the one-time signup bonus grant.
    #[must_use]
    pub fn signup_bonus(user_id: UserId, amount: i64) -> Self {
        Self {
            id: TransactionId::generate(),
            user_id,
            amount,
            transaction_type: TransactionType::SignupBonus,
            balance_after: amount,
            description: "Signup bonus".into(),
            payment_ref: None,
            created_at: Utc::now(),
        }
    }
}

/// Type of credit transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Credits purchased through a verified payment.
    Recharge,

    /// Credits deducted for a prediction.
    Prediction,

    /// Credits deducted for a college detail view.
    CollegeView,

    /// Credits deducted for a mentorship session booking.
    SessionBooking,

    /// Credits granted manually by staff.
    AdminGrant,

    /// One-time registration grant.
    SignupBonus,
}

impl TransactionType {
    /// Whether this type adds credits.
    #[must_use]
    pub const fn is_grant(&self) -> bool {
        matches!(self, Self::Recharge | Self::AdminGrant | Self::SignupBonus)
    }

    /// Whether this type removes credits.
    #[must_use]
    pub const fn is_deduction(&self) -> bool {
        matches!(
            self,
            Self::Prediction | Self::CollegeView | Self::SessionBooking
        )
    }
}
