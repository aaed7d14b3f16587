//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families. Record keys are raw id bytes; per-user indexes are
//! `user_id (16 bytes) || record_id (16 bytes)` so ULID ordering gives a
//! time-sorted scan.

use sha2::{Digest, Sha256};

use seatwise_core::{CutoffId, PredictionId, SavedDepartment, TransactionId, UserId};

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create an email index key. Emails are compared case-insensitively.
#[must_use]
pub fn email_key(email: &str) -> Vec<u8> {
    email.trim().to_ascii_lowercase().into_bytes()
}

/// Create a cutoff key from a cutoff ID.
#[must_use]
pub fn cutoff_key(cutoff_id: &CutoffId) -> Vec<u8> {
    cutoff_id.as_bytes().to_vec()
}

/// Create a transaction key from a transaction ID.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Create a user-transaction index key.
///
/// Format: `user_id (16 bytes) || transaction_id (16 bytes)`
#[must_use]
pub fn user_transaction_key(user_id: &UserId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Extract the transaction ID from a user-transaction index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_transaction_id_from_user_key(key: &[u8]) -> TransactionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    TransactionId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a prediction key from a prediction ID.
#[must_use]
pub fn prediction_key(prediction_id: &PredictionId) -> Vec<u8> {
    prediction_id.to_bytes().to_vec()
}

/// Create a user-prediction index key.
///
/// Format: `user_id (16 bytes) || prediction_id (16 bytes)`
#[must_use]
pub fn user_prediction_key(user_id: &UserId, prediction_id: &PredictionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&prediction_id.to_bytes());
    key
}

/// Extract the prediction ID from a user-prediction index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_prediction_id_from_user_key(key: &[u8]) -> PredictionId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    PredictionId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a prefix for iterating all per-user index entries.
#[must_use]
pub fn user_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a saved-department key.
///
/// Format: `user_id (16 bytes) || sha256 of the identity tuple (32 bytes)`.
/// The digest covers (institute, department, quota, seat gender, seat type)
/// with a field separator, so saving the same seat twice produces the same
/// key and overwrites instead of duplicating.
#[must_use]
pub fn saved_department_key(saved: &SavedDepartment) -> Vec<u8> {
    let mut key = Vec::with_capacity(48);
    key.extend_from_slice(saved.user_id.as_bytes());
    key.extend_from_slice(&saved_department_digest(saved));
    key
}

fn saved_department_digest(saved: &SavedDepartment) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for field in saved.identity() {
        hasher.update(field.as_bytes());
        hasher.update([0x1f]);
    }
    hasher.finalize().into()
}

/// The public identifier of a saved department: the hex digest half of its
/// key.
#[must_use]
pub fn saved_department_id(saved: &SavedDepartment) -> String {
    hex::encode(saved_department_digest(saved))
}

/// Reassemble a saved-department key from a user and the hex id returned
/// by [`saved_department_id`]. Returns `None` when the id is not a 64-char
/// hex digest.
#[must_use]
pub fn saved_department_key_from_id(user_id: &UserId, id: &str) -> Option<Vec<u8>> {
    let digest = hex::decode(id).ok()?;
    if digest.len() != 32 {
        return None;
    }
    let mut key = Vec::with_capacity(48);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&digest);
    Some(key)
}

/// Create a payment order key from an order id.
#[must_use]
pub fn payment_order_key(order_id: &str) -> Vec<u8> {
    order_id.as_bytes().to_vec()
}

/// Create a payment reference key.
#[must_use]
pub fn payment_ref_key(payment_ref: &str) -> Vec<u8> {
    payment_ref.as_bytes().to_vec()
}

/// Create a contact submission key.
#[must_use]
pub fn contact_key(id: &uuid::Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}
