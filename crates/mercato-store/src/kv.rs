//! Key-value store abstraction with automatic JSON serialization.

use crate::StoreError;
use serde::{de::DeserializeOwned, Serialize};

/// A key-value store holding JSON-serialized values.
///
/// Implementations wrap whatever the deployment actually persists to:
/// browser local storage, a hosted key-value service, or plain memory in
/// tests. Values are serialized with `serde_json` on the way in and out.
pub trait KvStore {
    /// Get a value by key. Returns `None` if the key does not exist.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>;

    /// Set a value, overwriting any existing value for the key.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;

    /// Set a value only if the key does not already exist.
    ///
    /// Returns `StoreError::Conflict` when the key is already present. This
    /// is the primitive one-time-use coupon consumption is built on.
    fn set_if_absent<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;

    /// Delete a value. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Check whether a key exists.
    fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// List all keys currently in the store.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
