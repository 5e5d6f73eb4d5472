//! Byte-oriented key-value persistence underneath the credential and key
//! stores. Keys are flat names; implementations decide where values live.
pub mod file;

use crate::error::kvstore::KeyValueStoreError;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub use file::FileKeyValueStore;

pub trait KeyValueStore: Send + Sync {
    /// Stores `value` under `key`, replacing whatever was there.
    fn store(&self, key: &str, value: &[u8]) -> Result<(), KeyValueStoreError>;

    /// Fails with [`KeyValueStoreError::NotFound`] when nothing is stored.
    fn load(&self, key: &str) -> Result<Vec<u8>, KeyValueStoreError>;

    /// Fails with [`KeyValueStoreError::NotFound`] when nothing is stored.
    fn delete(&self, key: &str) -> Result<(), KeyValueStoreError>;
}

/// Keys must be usable as a single file name.
pub(crate) fn validate_key(key: &str) -> Result<(), KeyValueStoreError> {
    let invalid = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);
    if invalid {
        Err(KeyValueStoreError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn store(&self, key: &str, value: &[u8]) -> Result<(), KeyValueStoreError> {
        validate_key(key)?;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Vec<u8>, KeyValueStoreError> {
        validate_key(key)?;
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| KeyValueStoreError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), KeyValueStoreError> {
        validate_key(key)?;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| KeyValueStoreError::NotFound(key.to_string()))
    }
}
