//! Payment order lifecycle records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::ids::UserId;

/// Which payment channel an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    /// Automated gateway: order created via API, completion verified by
    /// signature.
    Razorpay,
    /// Manual UPI path: user submits a transaction id, an admin approves.
    Cashfree,
}

/// Lifecycle state of a payment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Created, credits not yet granted.
    Pending,
    /// Verified or approved; credits granted exactly once.
    Completed,
    /// Rejected by the gateway or an admin.
    Failed,
}

/// A credit purchase order.
///
/// Orders are written once at creation and mutated once when they
/// complete or fail. The credit grant itself is keyed by the external
/// payment reference, not the order, so replaying a completion cannot
/// double-credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Gateway order id for the automated path, `man_<ulid>` for manual
    /// submissions.
    pub order_id: String,

    /// Purchasing user.
    pub user_id: UserId,

    /// Order amount in paise.
    pub amount_paise: u64,

    /// Credits granted on completion.
    pub credits: i64,

    /// Payment channel.
    pub provider: PaymentProvider,

    /// Lifecycle state.
    pub status: PaymentStatus,

    /// External payment reference once known (gateway payment id, or the
    /// user-submitted UPI transaction id).
    pub payment_ref: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PaymentOrder {
    /// Record a gateway order that was just created.
    #[must_use]
    pub fn gateway(order_id: String, user_id: UserId, amount_paise: u64, credits: i64) -> Self {
        let now = Utc::now();
        Self {
            order_id,
            user_id,
            amount_paise,
            credits,
            provider: PaymentProvider::Razorpay,
            status: PaymentStatus::Pending,
            payment_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a manual UPI submission awaiting admin approval.
    #[must_use]
    pub fn manual(user_id: UserId, transaction_id: String, amount_paise: u64, credits: i64) -> Self {
        let now = Utc::now();
        Self {
            order_id: format!("man_{}", Ulid::new()),
            user_id,
            amount_paise,
            credits,
            provider: PaymentProvider::Cashfree,
            status: PaymentStatus::Pending,
            payment_ref: Some(transaction_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to `Completed`, recording the external payment reference.
    pub fn complete(&mut self, payment_ref: String) {
        self.status = PaymentStatus::Completed;
        self.payment_ref = Some(payment_ref);
        self.updated_at = Utc::now();
    }

    /// Transition to `Failed`.
    pub fn fail(&mut self) {
        self.status = PaymentStatus::Failed;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_orders_get_prefixed_ids() {
        let order = PaymentOrder::manual(UserId::generate(), "UPI123".into(), 49_900, 50);
        assert!(order.order_id.starts_with("man_"));
        assert_eq!(order.provider, PaymentProvider::Cashfree);
        assert_eq!(order.status, PaymentStatus::Pending);
        assert_eq!(order.payment_ref.as_deref(), Some("UPI123"));
    }

    #[test]
    fn completion_records_payment_ref() {
        let mut order = PaymentOrder::gateway("order_abc".into(), UserId::generate(), 9_900, 10);
        assert!(order.payment_ref.is_none());

        order.complete("pay_xyz".into());
        assert_eq!(order.status, PaymentStatus::Completed);
        assert_eq!(order.payment_ref.as_deref(), Some("pay_xyz"));
        assert!(order.updated_at >= order.created_at);
    }
}
