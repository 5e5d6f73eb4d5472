use crate::error::kvstore::KeyValueStoreError;
use crate::kvstore::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Private keys by subject key identifier, stored as PKCS#8 PEM under
/// `<hex ski>_sk`.
#[derive(Clone)]
pub struct KeyStore {
    inner: Arc<dyn KeyValueStore>,
}

impl KeyStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    pub fn file(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileKeyValueStore::new(root)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }

    pub fn store_key(&self, ski: &[u8], pem: &[u8]) -> Result<(), KeyValueStoreError> {
        self.inner.store(&key_name(ski), pem)
    }

    pub fn load_key(&self, ski: &[u8]) -> Result<Vec<u8>, KeyValueStoreError> {
        self.inner.load(&key_name(ski))
    }
}

pub fn key_name(ski: &[u8]) -> String {
    format!("{}_sk", hex::encode(ski))
}
