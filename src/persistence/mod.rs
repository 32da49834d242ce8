//! Key-value persistence
//!
//! A tiny string store behind a trait so the engine can be tested without a
//! browser. Failures are typed here and swallowed by callers: persistence is
//! best-effort and never fatal.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

/// Storage failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to read {key}: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write {key}: {reason}")]
    Write { key: String, reason: String },
}

/// Durable string key-value store
pub trait KeyValueStore {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store that refuses every operation (private browsing, disabled storage)
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let view = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(view.get("k").unwrap(), Some("v".to_string()));
        assert_eq!(view.get("missing").unwrap(), None);
    }

    #[test]
    fn test_unavailable_store_errors() {
        let store = UnavailableStore;
        assert_eq!(store.get("k"), Err(StorageError::Unavailable));
        assert!(store.set("k", "v").is_err());
    }
}
