use crate::error::fs::FsError;
use crate::error::fs::FsError::{
    CreateDirectoryFailed, CreateTempFileFailed, PersistTempFileFailed, ReadFileFailed,
    RemoveFileFailed, WriteFileFailed,
};

use std::io::Write;
use std::path::{Path, PathBuf};

pub fn create_dir_all(path: &Path) -> Result<(), FsError> {
    std::fs::create_dir_all(path).map_err(|err| CreateDirectoryFailed(path.to_path_buf(), err))
}

pub fn parent(path: &Path) -> Result<PathBuf, FsError> {
    match path.parent() {
        None => Err(FsError::NoParent(path.to_path_buf())),
        Some(parent) => Ok(parent.to_path_buf()),
    }
}

pub fn read(path: &Path) -> Result<Vec<u8>, FsError> {
    std::fs::read(path).map_err(|err| ReadFileFailed(path.to_path_buf(), err))
}

pub fn remove_file(path: &Path) -> Result<(), FsError> {
    std::fs::remove_file(path).map_err(|err| RemoveFileFailed(path.to_path_buf(), err))
}

/// Replaces the content of `path` in one step: the bytes go to a temporary
/// file in the same directory which is then renamed over the target. Readers
/// see either the old or the new content, and of two concurrent writers the
/// last rename wins.
///
/// Automatically creates the containing directory. On unix the file is
/// readable by its owner only.
pub fn replace(path: &Path, contents: &[u8]) -> Result<(), FsError> {
    let containing_folder = parent(path)?;
    create_dir_all(&containing_folder)?;

    let mut temp = tempfile::NamedTempFile::new_in(&containing_folder)
        .map_err(|err| CreateTempFileFailed(containing_folder.clone(), err))?;
    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|err| WriteFileFailed(temp.path().to_path_buf(), err))?;
    temp.persist(path)
        .map_err(|err| PersistTempFileFailed(path.to_path_buf(), err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("file.pem");

        replace(&path, b"first").unwrap();
        replace(&path, b"second").unwrap();

        assert_eq!(read(&path).unwrap(), b"second");
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");

        assert!(read(&path).unwrap_err().is_not_found());
        assert!(remove_file(&path).unwrap_err().is_not_found());
    }
}
