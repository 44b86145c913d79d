//! In-memory key-value backend for tests and local development.

use crate::{KvStore, StoreError};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory [`KvStore`] backed by a mutex-guarded map.
///
/// Stores values as JSON bytes, same as a real backend would, so
/// serialization behavior in tests matches production.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKv {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("poisoned lock".to_string()))
    }
}

impl KvStore for MemoryKv {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let entries = self.lock()?;
        match entries.get(key) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.lock()?.insert(key.to_string(), bytes);
        Ok(())
    }

    fn set_if_absent<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        let mut entries = self.lock()?;
        if entries.contains_key(key) {
            return Err(StoreError::Conflict(key.to_string()));
        }
        entries.insert(key.to_string(), bytes);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = MemoryKv::new();
        store.set("k", &42u32).unwrap();
        let value: Option<u32> = store.get("k").unwrap();
        assert_eq!(value, Some(42));
    }

    #[test]
    fn test_get_missing_key() {
        let store = MemoryKv::new();
        let value: Option<String> = store.get("missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_set_if_absent_conflicts() {
        let store = MemoryKv::new();
        store.set_if_absent("once", &"first").unwrap();
        let err = store.set_if_absent("once", &"second").unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Losing the race must not overwrite the original value.
        let value: Option<String> = store.get("once").unwrap();
        assert_eq!(value.as_deref(), Some("first"));
    }

    #[test]
    fn test_delete() {
        let store = MemoryKv::new();
        store.set("k", &1u8).unwrap();
        store.delete("k").unwrap();
        assert!(!store.exists("k").unwrap());
        // Deleting again is a no-op.
        store.delete("k").unwrap();
    }

    #[test]
    fn test_keys() {
        let store = MemoryKv::new();
        store.set("a", &1u8).unwrap();
        store.set("b", &2u8).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
