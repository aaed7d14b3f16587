//! `RocksDB` storage layer for seatwise.
//!
//! This crate provides persistent storage for users, cutoff tables,
//! prediction snapshots, saved departments, payment orders, credit
//! transactions, and contact submissions using `RocksDB` with column
//! families for efficient indexing.
//!
//! # Architecture
//!
//! Records are CBOR-encoded. Each record type lives in its own column
//! family; per-user listings are served by `user_id || ulid` index
//! families. All multi-record mutations (debits, grants, prediction
//! recording) go through a single `WriteBatch` so a crash can never leave
//! the balance and the ledger disagreeing, and the implementation
//! serializes them so concurrent mutations of one balance cannot lose an
//! update.
//!
//! # Example
//!
//! ```no_run
//! use seatwise_store::{RocksStore, Store};
//! use seatwise_core::{Category, Gender, User, UserId};
//!
//! let store = RocksStore::open("/tmp/seatwise-db").unwrap();
//!
//! let user = User::new(
//!     UserId::generate(),
//!     "Asha".into(),
//!     "asha@example.com".into(),
//!     "9000000001".into(),
//!     Gender::Female,
//!     Category::General,
//!     "Kerala".into(),
//! );
//! store.put_user(&user).unwrap();
//!
//! let retrieved = store.get_user_by_email("asha@example.com").unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use seatwise_core::{
    ContactSubmission, CreditTransaction, CutoffQuery, CutoffRow, PaymentOrder, Prediction,
    PredictionId, SavedDepartment, TransactionId, User, UserId,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert or update a user record, maintaining the email index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_user(&self, user: &User) -> Result<()>;

    /// Register a new user: store the record, the email index entry, and
    /// the signup-bonus ledger entry in one batch.
    ///
    /// The user record already carries the bonus in its balance; `bonus` is
    /// only the ledger entry that accounts for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create_user(&self, user: &User, bonus: &CreditTransaction) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// Get a user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Delete a user by ID, including the email index entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    fn delete_user(&self, user_id: &UserId) -> Result<()>;

    // =========================================================================
    // Cutoff Operations
    // =========================================================================

    /// Insert or update a batch of cutoff rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_cutoffs(&self, rows: &[CutoffRow]) -> Result<()>;

    /// Count all stored cutoff rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_cutoffs(&self) -> Result<u64>;

    /// Return all cutoff rows matching a query's predicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn query_cutoffs(&self, query: &CutoffQuery) -> Result<Vec<CutoffRow>>;

    // =========================================================================
    // Prediction Operations
    // =========================================================================

    /// Get a prediction snapshot by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_prediction(&self, prediction_id: &PredictionId) -> Result<Option<Prediction>>;

    /// List prediction snapshots for a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_predictions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Prediction>>;

    // =========================================================================
    // Saved Department Operations
    // =========================================================================

    /// Save a department, de-duplicating on the identity tuple.
    ///
    /// Returns the entry's id (stable across re-saves of the same seat)
    /// and whether a new entry was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn save_department(&self, saved: &SavedDepartment) -> Result<(String, bool)>;

    /// List a user's saved departments.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_saved_departments(&self, user_id: &UserId) -> Result<Vec<(String, SavedDepartment)>>;

    /// Delete one saved department by its id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such entry exists for the user.
    fn delete_saved_department(&self, user_id: &UserId, id: &str) -> Result<()>;

    // =========================================================================
    // Payment Operations
    // =========================================================================

    /// Insert or update a payment order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_payment_order(&self, order: &PaymentOrder) -> Result<()>;

    /// Get a payment order by its order id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_payment_order(&self, order_id: &str) -> Result<Option<PaymentOrder>>;

    /// List all pending payment orders (admin reconciliation view).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_pending_payment_orders(&self) -> Result<Vec<PaymentOrder>>;

    /// Check whether an external payment reference was already applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_payment_ref(&self, payment_ref: &str) -> Result<bool>;

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    /// Get a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<CreditTransaction>>;

    /// List transactions for a user, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CreditTransaction>>;

    // =========================================================================
    // Contact Operations
    // =========================================================================

    /// Insert or update a contact submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_contact_submission(&self, submission: &ContactSubmission) -> Result<()>;

    /// Get a contact submission by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_contact_submission(&self, id: &uuid::Uuid) -> Result<Option<ContactSubmission>>;

    /// List contact submissions, optionally filtered to unresolved ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_contact_submissions(&self, unresolved_only: bool) -> Result<Vec<ContactSubmission>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Deduct credits and record the ledger entry atomically.
    ///
    /// The stored transaction's `balance_after` is overwritten with the
    /// authoritative post-write balance. Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::InsufficientCredits` if the balance is too low.
    fn debit_credits(&self, user_id: &UserId, transaction: &CreditTransaction) -> Result<i64>;

    /// Record a prediction: deduct credits, store the snapshot, and write
    /// the ledger entry in one batch.
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::InsufficientCredits` if the balance is too low.
    fn record_prediction(
        &self,
        prediction: &Prediction,
        transaction: &CreditTransaction,
    ) -> Result<i64>;

    /// Add credits and record the ledger entry atomically (signup bonus,
    /// admin grant).
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    fn grant_credits(&self, user_id: &UserId, transaction: &CreditTransaction) -> Result<i64>;

    /// Apply a verified payment: add credits, record the ledger entry, mark
    /// the payment reference applied, and (when given) persist the updated
    /// order, all in one batch.
    ///
    /// This is the single primitive both the gateway verification path and
    /// the admin manual-approval path converge on. Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `StoreError::DuplicatePayment` if `payment_ref` was already
    ///   applied.
    /// - `StoreError::NotFound` if the user doesn't exist.
    fn grant_credits_for_payment(
        &self,
        user_id: &UserId,
        payment_ref: &str,
        transaction: &CreditTransaction,
        order: Option<&PaymentOrder>,
    ) -> Result<i64>;
}
