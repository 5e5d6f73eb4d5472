use crate::error::kvstore::KeyValueStoreError;
use crate::error::kvstore::KeyValueStoreError::{DeleteFailed, LoadFailed, NotFound, StoreFailed};
use crate::kvstore::{validate_key, KeyValueStore};
use std::path::{Path, PathBuf};

/// Stores each value in its own file under a root directory. The directory
/// is created on first write; nothing touches the filesystem before that.
#[derive(Clone, Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, KeyValueStoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn store(&self, key: &str, value: &[u8]) -> Result<(), KeyValueStoreError> {
        let path = self.path_for(key)?;
        crate::fs::replace(&path, value).map_err(|err| StoreFailed(key.to_string(), err))
    }

    fn load(&self, key: &str) -> Result<Vec<u8>, KeyValueStoreError> {
        let path = self.path_for(key)?;
        crate::fs::read(&path).map_err(|err| {
            if err.is_not_found() {
                NotFound(key.to_string())
            } else {
                LoadFailed(key.to_string(), err)
            }
        })
    }

    fn delete(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let path = self.path_for(key)?;
        crate::fs::remove_file(&path).map_err(|err| {
            if err.is_not_found() {
                NotFound(key.to_string())
            } else {
                DeleteFailed(key.to_string(), err)
            }
        })
    }
}
