use crate::error::fs::FsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeyValueStoreError {
    #[error("Invalid store key '{0}'")]
    InvalidKey(String),

    #[error("Key '{0}' not found")]
    NotFound(String),

    #[error("Failed to load '{0}'")]
    LoadFailed(String, #[source] FsError),

    #[error("Failed to store '{0}'")]
    StoreFailed(String, #[source] FsError),

    #[error("Failed to delete '{0}'")]
    DeleteFailed(String, #[source] FsError),
}
