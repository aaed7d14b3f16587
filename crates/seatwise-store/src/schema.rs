//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary user records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: lowercased email -> `user_id`.
    pub const USERS_BY_EMAIL: &str = "users_by_email";

    /// Cutoff reference rows, keyed by `cutoff_id`.
    pub const CUTOFFS: &str = "cutoffs";

    /// Prediction snapshots, keyed by `prediction_id` (ULID).
    pub const PREDICTIONS: &str = "predictions";

    /// Index: predictions by user, keyed by `user_id || prediction_id`.
    /// Value is empty (index only).
    pub const PREDICTIONS_BY_USER: &str = "predictions_by_user";

    /// Saved departments, keyed by `user_id || sha256(identity tuple)`.
    pub const SAVED_DEPARTMENTS: &str = "saved_departments";

    /// Payment orders, keyed by order id string.
    pub const PAYMENT_ORDERS: &str = "payment_orders";

    /// Applied external payment references for idempotency, keyed by the
    /// reference string. Value is the order id it was applied for.
    pub const PAYMENT_REFS: &str = "payment_refs";

    /// Credit transactions, keyed by `transaction_id` (ULID).
    pub const TRANSACTIONS: &str = "transactions";

    /// Index: transactions by user, keyed by `user_id || transaction_id`.
    /// Value is empty (index only).
    pub const TRANSACTIONS_BY_USER: &str = "transactions_by_user";

    /// Contact form submissions, keyed by submission id.
    pub const CONTACT_SUBMISSIONS: &str = "contact_submissions";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_EMAIL,
        cf::CUTOFFS,
        cf::PREDICTIONS,
        cf::PREDICTIONS_BY_USER,
        cf::SAVED_DEPARTMENTS,
        cf::PAYMENT_ORDERS,
        cf::PAYMENT_REFS,
        cf::TRANSACTIONS,
        cf::TRANSACTIONS_BY_USER,
        cf::CONTACT_SUBMISSIONS,
    ]
}
