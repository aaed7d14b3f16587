//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use seatwise_core::{
    row_matches, ContactSubmission, CreditTransaction, CutoffQuery, CutoffRow, PaymentOrder,
    PaymentStatus, Prediction, PredictionId, SavedDepartment, TransactionId, TransactionType,
    User, UserId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,

    /// Serializes balance mutations. The compound operations are
    /// read-modify-write over the user record; the `WriteBatch` gives
    /// crash atomicity but not isolation, so the lock is held across the
    /// read, the balance check, and the commit.
    balance_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            balance_lock: Mutex::new(()),
        })
    }

    /// Take the balance lock. A poisoned lock means a thread panicked
    /// mid-mutation; further balance writes are refused.
    fn lock_balances(&self) -> Result<MutexGuard<'_, ()>> {
        self.balance_lock
            .lock()
            .map_err(|_| StoreError::Database("balance lock poisoned".into()))
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_cf_value<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Collect all per-user index keys under `prefix`, newest first.
    fn user_index_keys(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, rocksdb::Direction::Forward));

        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            all_keys.push(key.to_vec());
        }

        // ULIDs are time-ordered, so reversing gives newest first.
        all_keys.reverse();
        Ok(all_keys)
    }

    /// Stage the user update, ledger entry, and index entry for a balance
    /// change. Sets `balance_after` from the post-change balance.
    fn stage_ledger_write(
        &self,
        batch: &mut WriteBatch,
        user: &User,
        transaction: &CreditTransaction,
    ) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_tx_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let mut tx = transaction.clone();
        tx.balance_after = user.credits;

        batch.put_cf(&cf_users, keys::user_key(&user.user_id), Self::serialize(user)?);
        batch.put_cf(&cf_tx, keys::transaction_key(&tx.id), Self::serialize(&tx)?);
        batch.put_cf(
            &cf_tx_by_user,
            keys::user_transaction_key(&user.user_id, &tx.id),
            [],
        );
        Ok(())
    }

    /// Apply a transaction's amount to a user's balance and lifetime
    /// counters in memory.
    fn apply_amount(user: &mut User, transaction: &CreditTransaction) {
        user.credits += transaction.amount;
        if transaction.transaction_type == TransactionType::Recharge {
            user.lifetime_recharged += transaction.amount;
        } else if transaction.amount < 0 {
            user.lifetime_spent += transaction.amount.abs();
        }
        user.updated_at = chrono::Utc::now();
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn put_user(&self, user: &User) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_email = self.cf(cf::USERS_BY_EMAIL)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, keys::user_key(&user.user_id), Self::serialize(user)?);
        batch.put_cf(
            &cf_email,
            keys::email_key(&user.email),
            user.user_id.as_bytes(),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn create_user(&self, user: &User, bonus: &CreditTransaction) -> Result<()> {
        let _guard = self.lock_balances()?;
        let cf_email = self.cf(cf::USERS_BY_EMAIL)?;

        let mut batch = WriteBatch::default();
        // stage_ledger_write stores the user record and the ledger entry;
        // the email index completes the registration.
        self.stage_ledger_write(&mut batch, user, bonus)?;
        batch.put_cf(
            &cf_email,
            keys::email_key(&user.email),
            user.user_id.as_bytes(),
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        self.get_cf_value(cf::USERS, &keys::user_key(user_id))
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let cf = self.cf(cf::USERS_BY_EMAIL)?;
        let Some(id_bytes) = self
            .db
            .get_cf(&cf, keys::email_key(email))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let bytes: [u8; 16] = id_bytes
            .as_slice()
            .try_into()
            .map_err(|_| StoreError::Serialization("malformed email index entry".into()))?;
        let user_id = UserId::from_uuid(uuid::Uuid::from_bytes(bytes));

        self.get_user(&user_id)
    }

    fn delete_user(&self, user_id: &UserId) -> Result<()> {
        let user = self.get_user(user_id)?.ok_or(StoreError::NotFound)?;

        let cf_users = self.cf(cf::USERS)?;
        let cf_email = self.cf(cf::USERS_BY_EMAIL)?;

        let mut batch = WriteBatch::default();
        batch.delete_cf(&cf_users, keys::user_key(user_id));
        batch.delete_cf(&cf_email, keys::email_key(&user.email));

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    // =========================================================================
    // Cutoff Operations
    // =========================================================================

    fn put_cutoffs(&self, rows: &[CutoffRow]) -> Result<()> {
        let cf = self.cf(cf::CUTOFFS)?;

        let mut batch = WriteBatch::default();
        for row in rows {
            batch.put_cf(&cf, keys::cutoff_key(&row.id), Self::serialize(row)?);
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(rows = rows.len(), "stored cutoff batch");
        Ok(())
    }

    fn count_cutoffs(&self) -> Result<u64> {
        let cf = self.cf(cf::CUTOFFS)?;
        let mut count = 0u64;
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            item.map_err(|e| StoreError::Database(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }

    fn query_cutoffs(&self, query: &CutoffQuery) -> Result<Vec<CutoffRow>> {
        // Full scan with the predicate applied row by row. The cutoff table
        // is reference data in the tens of thousands of rows, well within a
        // single CF scan.
        let cf = self.cf(cf::CUTOFFS)?;
        let mut matches = Vec::new();

        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let row: CutoffRow = Self::deserialize(&value)?;
            if row_matches(&row, query) {
                matches.push(row);
            }
        }

        Ok(matches)
    }

    // =========================================================================
    // Prediction Operations
    // =========================================================================

    fn get_prediction(&self, prediction_id: &PredictionId) -> Result<Option<Prediction>> {
        self.get_cf_value(cf::PREDICTIONS, &keys::prediction_key(prediction_id))
    }

    fn list_predictions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Prediction>> {
        let prefix = keys::user_prefix(user_id);
        let all_keys = self.user_index_keys(cf::PREDICTIONS_BY_USER, &prefix)?;

        let mut predictions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if predictions.len() >= limit {
                break;
            }
            let id = keys::extract_prediction_id_from_user_key(&key);
            if let Some(prediction) = self.get_prediction(&id)? {
                predictions.push(prediction);
            }
        }

        Ok(predictions)
    }

    // =========================================================================
    // Saved Department Operations
    // =========================================================================

    fn save_department(&self, saved: &SavedDepartment) -> Result<(String, bool)> {
        let cf = self.cf(cf::SAVED_DEPARTMENTS)?;
        let key = keys::saved_department_key(saved);
        let id = keys::saved_department_id(saved);

        // Deterministic key: re-saving the same seat keeps the original
        // entry (and its save-time rank) rather than duplicating.
        let exists = self
            .db
            .get_cf(&cf, &key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        if exists {
            return Ok((id, false));
        }

        self.db
            .put_cf(&cf, key, Self::serialize(saved)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok((id, true))
    }

    fn list_saved_departments(&self, user_id: &UserId) -> Result<Vec<(String, SavedDepartment)>> {
        let cf = self.cf(cf::SAVED_DEPARTMENTS)?;
        let prefix = keys::user_prefix(user_id);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&prefix, rocksdb::Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            let saved: SavedDepartment = Self::deserialize(&value)?;
            entries.push((hex::encode(&key[16..]), saved));
        }

        // Newest first for display.
        entries.sort_by(|a, b| b.1.created_at.cmp(&a.1.created_at));
        Ok(entries)
    }

    fn delete_saved_department(&self, user_id: &UserId, id: &str) -> Result<()> {
        let key = keys::saved_department_key_from_id(user_id, id).ok_or(StoreError::NotFound)?;
        let cf = self.cf(cf::SAVED_DEPARTMENTS)?;

        let exists = self
            .db
            .get_cf(&cf, &key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        if !exists {
            return Err(StoreError::NotFound);
        }

        self.db
            .delete_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    // =========================================================================
    // Payment Operations
    // =========================================================================

    fn put_payment_order(&self, order: &PaymentOrder) -> Result<()> {
        let cf = self.cf(cf::PAYMENT_ORDERS)?;
        self.db
            .put_cf(
                &cf,
                keys::payment_order_key(&order.order_id),
                Self::serialize(order)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn get_payment_order(&self, order_id: &str) -> Result<Option<PaymentOrder>> {
        self.get_cf_value(cf::PAYMENT_ORDERS, &keys::payment_order_key(order_id))
    }

    fn list_pending_payment_orders(&self) -> Result<Vec<PaymentOrder>> {
        let cf = self.cf(cf::PAYMENT_ORDERS)?;

        let mut pending = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let order: PaymentOrder = Self::deserialize(&value)?;
            if order.status == PaymentStatus::Pending {
                pending.push(order);
            }
        }

        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(pending)
    }

    fn has_payment_ref(&self, payment_ref: &str) -> Result<bool> {
        let cf = self.cf(cf::PAYMENT_REFS)?;
        let exists = self
            .db
            .get_cf(&cf, keys::payment_ref_key(payment_ref))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .is_some();
        Ok(exists)
    }

    // =========================================================================
    // Transaction Operations
    // =========================================================================

    fn get_transaction(&self, transaction_id: &TransactionId) -> Result<Option<CreditTransaction>> {
        self.get_cf_value(cf::TRANSACTIONS, &keys::transaction_key(transaction_id))
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<CreditTransaction>> {
        let prefix = keys::user_prefix(user_id);
        let all_keys = self.user_index_keys(cf::TRANSACTIONS_BY_USER, &prefix)?;

        let mut transactions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if transactions.len() >= limit {
                break;
            }
            let tx_id = keys::extract_transaction_id_from_user_key(&key);
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }

    // =========================================================================
    // Contact Operations
    // =========================================================================

    fn put_contact_submission(&self, submission: &ContactSubmission) -> Result<()> {
        let cf = self.cf(cf::CONTACT_SUBMISSIONS)?;
        self.db
            .put_cf(
                &cf,
                keys::contact_key(&submission.id),
                Self::serialize(submission)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn get_contact_submission(&self, id: &uuid::Uuid) -> Result<Option<ContactSubmission>> {
        self.get_cf_value(cf::CONTACT_SUBMISSIONS, &keys::contact_key(id))
    }

    fn list_contact_submissions(&self, unresolved_only: bool) -> Result<Vec<ContactSubmission>> {
        let cf = self.cf(cf::CONTACT_SUBMISSIONS)?;

        let mut submissions = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let submission: ContactSubmission = Self::deserialize(&value)?;
            if !unresolved_only || !submission.resolved {
                submissions.push(submission);
            }
        }

        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(submissions)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn debit_credits(&self, user_id: &UserId, transaction: &CreditTransaction) -> Result<i64> {
        let _guard = self.lock_balances()?;
        let mut user = self.get_user(user_id)?.ok_or(StoreError::NotFound)?;

        let required = transaction.amount.abs();
        if user.credits < required {
            return Err(StoreError::InsufficientCredits {
                balance: user.credits,
                required,
            });
        }

        Self::apply_amount(&mut user, transaction);

        let mut batch = WriteBatch::default();
        self.stage_ledger_write(&mut batch, &user, transaction)?;

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(user.credits)
    }

    fn record_prediction(
        &self,
        prediction: &Prediction,
        transaction: &CreditTransaction,
    ) -> Result<i64> {
        let _guard = self.lock_balances()?;
        let mut user = self
            .get_user(&prediction.user_id)?
            .ok_or(StoreError::NotFound)?;

        let required = transaction.amount.abs();
        if user.credits < required {
            return Err(StoreError::InsufficientCredits {
                balance: user.credits,
                required,
            });
        }

        Self::apply_amount(&mut user, transaction);

        let cf_predictions = self.cf(cf::PREDICTIONS)?;
        let cf_by_user = self.cf(cf::PREDICTIONS_BY_USER)?;

        let mut batch = WriteBatch::default();
        self.stage_ledger_write(&mut batch, &user, transaction)?;
        batch.put_cf(
            &cf_predictions,
            keys::prediction_key(&prediction.id),
            Self::serialize(prediction)?,
        );
        batch.put_cf(
            &cf_by_user,
            keys::user_prediction_key(&prediction.user_id, &prediction.id),
            [],
        );

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(user.credits)
    }

    fn grant_credits(&self, user_id: &UserId, transaction: &CreditTransaction) -> Result<i64> {
        let _guard = self.lock_balances()?;
        let mut user = self.get_user(user_id)?.ok_or(StoreError::NotFound)?;

        Self::apply_amount(&mut user, transaction);

        let mut batch = WriteBatch::default();
        self.stage_ledger_write(&mut batch, &user, transaction)?;

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(user.credits)
    }

    fn grant_credits_for_payment(
        &self,
        user_id: &UserId,
        payment_ref: &str,
        transaction: &CreditTransaction,
        order: Option<&PaymentOrder>,
    ) -> Result<i64> {
        // The lock also closes the window between the payment-ref check
        // and the batch write, so one reference cannot credit twice.
        let _guard = self.lock_balances()?;

        if self.has_payment_ref(payment_ref)? {
            return Err(StoreError::DuplicatePayment {
                payment_ref: payment_ref.to_string(),
            });
        }

        let mut user = self.get_user(user_id)?.ok_or(StoreError::NotFound)?;

        Self::apply_amount(&mut user, transaction);

        let cf_refs = self.cf(cf::PAYMENT_REFS)?;

        let mut batch = WriteBatch::default();
        self.stage_ledger_write(&mut batch, &user, transaction)?;

        let order_id = order.map(|o| o.order_id.as_str()).unwrap_or_default();
        batch.put_cf(
            &cf_refs,
            keys::payment_ref_key(payment_ref),
            order_id.as_bytes(),
        );

        if let Some(order) = order {
            let cf_orders = self.cf(cf::PAYMENT_ORDERS)?;
            batch.put_cf(
                &cf_orders,
                keys::payment_order_key(&order.order_id),
                Self::serialize(order)?,
            );
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(user.credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatwise_core::{
        CandidateProfile, Category, ExamType, Gender, Quota, SeatGender,
        PREDICTION_COST_CREDITS, SIGNUP_BONUS_CREDITS,
    };
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn test_user() -> User {
        User::new(
            UserId::generate(),
            "Asha".into(),
            "asha@example.com".into(),
            "9000000001".into(),
            Gender::Female,
            Category::General,
            "Kerala".into(),
        )
    }

    fn test_profile() -> CandidateProfile {
        CandidateProfile {
            rank: 10_000,
            category_rank: None,
            category: Category::General,
            gender: Gender::Female,
            home_state: "Kerala".into(),
            pwd: false,
            exam: ExamType::Main,
        }
    }

    fn test_cutoff(seat_type: &str, quota: Quota, closing: u64) -> CutoffRow {
        CutoffRow {
            id: seatwise_core::CutoffId::generate(),
            institute: "NITK".into(),
            institute_type: seatwise_core::InstituteType::Nit,
            institute_state: "Karnataka".into(),
            department: "CSE".into(),
            quota,
            seat_type: seat_type.into(),
            seat_gender: SeatGender::GenderNeutral,
            opening_rank: 1,
            closing_rank: closing,
            year: 2024,
            round: 6,
            institute_ranking: Some(12),
        }
    }

    #[test]
    fn user_crud_and_email_lookup() {
        let (store, _dir) = create_test_store();
        let user = test_user();

        store.put_user(&user).unwrap();

        let by_id = store.get_user(&user.user_id).unwrap().unwrap();
        assert_eq!(by_id.credits, SIGNUP_BONUS_CREDITS);

        // Email lookup is case-insensitive.
        let by_email = store.get_user_by_email("ASHA@example.COM").unwrap().unwrap();
        assert_eq!(by_email.user_id, user.user_id);

        store.delete_user(&user.user_id).unwrap();
        assert!(store.get_user(&user.user_id).unwrap().is_none());
        assert!(store.get_user_by_email("asha@example.com").unwrap().is_none());
        assert!(matches!(
            store.delete_user(&user.user_id),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn create_user_writes_signup_bonus_ledger_entry() {
        let (store, _dir) = create_test_store();
        let user = test_user();
        let bonus = CreditTransaction::signup_bonus(user.user_id, SIGNUP_BONUS_CREDITS);

        store.create_user(&user, &bonus).unwrap();

        let stored = store.get_user(&user.user_id).unwrap().unwrap();
        assert_eq!(stored.credits, SIGNUP_BONUS_CREDITS);
        assert_eq!(stored.lifetime_recharged, SIGNUP_BONUS_CREDITS);

        let transactions = store.list_transactions_by_user(&user.user_id, 10, 0).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, SIGNUP_BONUS_CREDITS);
        assert_eq!(transactions[0].balance_after, SIGNUP_BONUS_CREDITS);

        assert!(store
            .get_user_by_email("asha@example.com")
            .unwrap()
            .is_some());
    }

    #[test]
    fn cutoff_query_filters_rows() {
        let (store, _dir) = create_test_store();
        store
            .put_cutoffs(&[
                test_cutoff("OPEN", Quota::AllIndia, 20_000),
                test_cutoff("OPEN", Quota::AllIndia, 5_000),
                test_cutoff("OBC-NCL", Quota::AllIndia, 20_000),
            ])
            .unwrap();

        assert_eq!(store.count_cutoffs().unwrap(), 3);

        let query = CutoffQuery {
            seat_type: "OPEN".into(),
            quota: Quota::AllIndia,
            home_state: None,
            institute_type: None,
            rank: 10_000,
        };
        let rows = store.query_cutoffs(&query).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].closing_rank, 20_000);
    }

    #[test]
    fn record_prediction_debits_and_snapshots() {
        let (store, _dir) = create_test_store();
        let user = test_user();
        store.put_user(&user).unwrap();

        let prediction = Prediction::new(user.user_id, test_profile(), Some(99.2), vec![]);
        let tx = CreditTransaction::prediction(user.user_id, PREDICTION_COST_CREDITS, 0);

        let balance = store.record_prediction(&prediction, &tx).unwrap();
        assert_eq!(balance, SIGNUP_BONUS_CREDITS - PREDICTION_COST_CREDITS);

        // Snapshot is retrievable and indexed.
        let stored = store.get_prediction(&prediction.id).unwrap().unwrap();
        assert_eq!(stored.user_id, user.user_id);
        let listed = store.list_predictions_by_user(&user.user_id, 10, 0).unwrap();
        assert_eq!(listed.len(), 1);

        // Ledger entry carries the authoritative post-write balance.
        let transactions = store.list_transactions_by_user(&user.user_id, 10, 0).unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].balance_after, balance);

        // Lifetime spend tracked.
        let updated = store.get_user(&user.user_id).unwrap().unwrap();
        assert_eq!(updated.lifetime_spent, PREDICTION_COST_CREDITS);
    }

    #[test]
    fn debit_rejects_insufficient_balance() {
        let (store, _dir) = create_test_store();
        let mut user = test_user();
        user.credits = 5;
        store.put_user(&user).unwrap();

        let tx = CreditTransaction::prediction(user.user_id, PREDICTION_COST_CREDITS, 0);
        let result = store.debit_credits(&user.user_id, &tx);

        assert!(matches!(
            result,
            Err(StoreError::InsufficientCredits {
                balance: 5,
                required: 10
            })
        ));

        // Nothing was written.
        let unchanged = store.get_user(&user.user_id).unwrap().unwrap();
        assert_eq!(unchanged.credits, 5);
        assert!(store
            .list_transactions_by_user(&user.user_id, 10, 0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn concurrent_debits_cannot_overdraw() {
        let (store, _dir) = create_test_store();
        let user = test_user();
        let bonus = CreditTransaction::signup_bonus(user.user_id, SIGNUP_BONUS_CREDITS);
        store.create_user(&user, &bonus).unwrap();

        // A 15-credit balance covers exactly one 10-credit debit; with two
        // racing, one must fail with the post-debit balance.
        let store = Arc::new(store);
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                let user_id = user.user_id;
                std::thread::spawn(move || {
                    let tx = CreditTransaction::prediction(user_id, PREDICTION_COST_CREDITS, 0);
                    store.debit_credits(&user_id, &tx)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(StoreError::InsufficientCredits {
                balance: 5,
                required: 10
            })
        )));

        let stored = store.get_user(&user.user_id).unwrap().unwrap();
        assert_eq!(stored.credits, SIGNUP_BONUS_CREDITS - PREDICTION_COST_CREDITS);

        // The ledger still reproduces the balance.
        let ledger_sum: i64 = store
            .list_transactions_by_user(&user.user_id, 10, 0)
            .unwrap()
            .iter()
            .map(|t| t.amount)
            .sum();
        assert_eq!(ledger_sum, stored.credits);
    }

    #[test]
    fn payment_grant_is_idempotent() {
        let (store, _dir) = create_test_store();
        let user = test_user();
        store.put_user(&user).unwrap();

        let mut order =
            PaymentOrder::gateway("order_abc".into(), user.user_id, 49_900, 50);
        order.complete("pay_xyz".into());

        let tx = CreditTransaction::recharge(
            user.user_id,
            50,
            0,
            "pay_xyz".into(),
            "Recharge".into(),
        );

        let balance = store
            .grant_credits_for_payment(&user.user_id, "pay_xyz", &tx, Some(&order))
            .unwrap();
        assert_eq!(balance, SIGNUP_BONUS_CREDITS + 50);

        // Replaying the same payment reference is rejected and does not
        // credit again.
        let tx2 = CreditTransaction::recharge(
            user.user_id,
            50,
            0,
            "pay_xyz".into(),
            "Recharge".into(),
        );
        let result = store.grant_credits_for_payment(&user.user_id, "pay_xyz", &tx2, Some(&order));
        assert!(matches!(result, Err(StoreError::DuplicatePayment { .. })));

        let unchanged = store.get_user(&user.user_id).unwrap().unwrap();
        assert_eq!(unchanged.credits, SIGNUP_BONUS_CREDITS + 50);
        assert_eq!(unchanged.lifetime_recharged, SIGNUP_BONUS_CREDITS + 50);

        // Order landed as completed.
        let stored = store.get_payment_order("order_abc").unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Completed);
    }

    #[test]
    fn pending_orders_listed_oldest_first() {
        let (store, _dir) = create_test_store();
        let user = test_user();

        let first = PaymentOrder::manual(user.user_id, "UPI1".into(), 9_900, 10);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = PaymentOrder::manual(user.user_id, "UPI2".into(), 9_900, 10);
        let mut done = PaymentOrder::gateway("order_x".into(), user.user_id, 9_900, 10);
        done.complete("pay_1".into());

        store.put_payment_order(&second).unwrap();
        store.put_payment_order(&first).unwrap();
        store.put_payment_order(&done).unwrap();

        let pending = store.list_pending_payment_orders().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].order_id, first.order_id);
    }

    #[test]
    fn saved_departments_dedup_on_identity() {
        let (store, _dir) = create_test_store();
        let user = test_user();

        let entry = SavedDepartment {
            user_id: user.user_id,
            institute: "NITK".into(),
            department: "CSE".into(),
            quota: Quota::AllIndia,
            seat_gender: SeatGender::GenderNeutral,
            seat_type: "OPEN".into(),
            rank_at_save: 9_000,
            created_at: chrono::Utc::now(),
        };

        let (id1, created) = store.save_department(&entry).unwrap();
        assert!(created);

        // Re-save with a different rank: same id, original entry kept.
        let mut resave = entry.clone();
        resave.rank_at_save = 1;
        let (id2, created) = store.save_department(&resave).unwrap();
        assert_eq!(id1, id2);
        assert!(!created);

        let listed = store.list_saved_departments(&user.user_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, id1);
        assert_eq!(listed[0].1.rank_at_save, 9_000);

        store.delete_saved_department(&user.user_id, &id1).unwrap();
        assert!(store
            .list_saved_departments(&user.user_id)
            .unwrap()
            .is_empty());
        assert!(matches!(
            store.delete_saved_department(&user.user_id, &id1),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn transaction_listing_paginates_newest_first() {
        let (store, _dir) = create_test_store();
        let user = test_user();
        store.put_user(&user).unwrap();

        // ULIDs are generated at creation time, so space them out.
        let tx1 = CreditTransaction::admin_grant(user.user_id, 5, 0, "Grant 1".into());
        store.grant_credits(&user.user_id, &tx1).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let tx2 = CreditTransaction::admin_grant(user.user_id, 5, 0, "Grant 2".into());
        store.grant_credits(&user.user_id, &tx2).unwrap();

        let page1 = store.list_transactions_by_user(&user.user_id, 1, 0).unwrap();
        let page2 = store.list_transactions_by_user(&user.user_id, 1, 1).unwrap();
        assert_eq!(page1[0].description, "Grant 2");
        assert_eq!(page2[0].description, "Grant 1");
    }

    #[test]
    fn contact_submissions_filter_unresolved() {
        let (store, _dir) = create_test_store();

        let mut resolved = ContactSubmission::new(
            "Ravi".into(),
            "ravi@example.com".into(),
            None,
            "Hello".into(),
        );
        resolved.resolve();
        let open = ContactSubmission::new(
            "Meera".into(),
            "meera@example.com".into(),
            Some("9000000002".into()),
            "Need help".into(),
        );

        store.put_contact_submission(&resolved).unwrap();
        store.put_contact_submission(&open).unwrap();

        assert_eq!(store.list_contact_submissions(false).unwrap().len(), 2);
        let unresolved = store.list_contact_submissions(true).unwrap();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].name, "Meera");
    }
}
