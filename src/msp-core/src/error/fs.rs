use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("Failed to create {0}: {1}")]
    CreateDirectoryFailed(PathBuf, std::io::Error),

    #[error("Failed to create temporary file in {0}: {1}")]
    CreateTempFileFailed(PathBuf, std::io::Error),

    #[error("Cannot determine parent folder for {0}")]
    NoParent(PathBuf),

    #[error("Failed to move temporary file into place at {0}: {1}")]
    PersistTempFileFailed(PathBuf, std::io::Error),

    #[error("Failed to read {0}: {1}")]
    ReadFileFailed(PathBuf, std::io::Error),

    #[error("Failed to remove file {0}: {1}")]
    RemoveFileFailed(PathBuf, std::io::Error),

    #[error("Failed to write to {0}: {1}")]
    WriteFileFailed(PathBuf, std::io::Error),
}

impl FsError {
    /// Whether the underlying failure was a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        match self {
            FsError::ReadFileFailed(_, err) | FsError::RemoveFileFailed(_, err) => {
                err.kind() == ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
