//! File reads and atomic writes used by the key store and the orchestrator

use crate::{error::HybridError, Result};
use std::{
    fs,
    io::{ErrorKind as IoErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Read a whole file, reporting a missing file as `FileMissing`
pub fn read_existing(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        IoErrorKind::NotFound => HybridError::FileMissing {
            path: path.to_path_buf(),
        },
        _ => HybridError::io(path, e),
    })
}

/// Fail with `FileMissing` unless `path` names an existing file
pub fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(HybridError::FileMissing {
            path: path.to_path_buf(),
        })
    }
}

/// Create the parent directory of `path` if needed and return it
pub fn ensure_parent_dir(path: &Path) -> Result<PathBuf> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| HybridError::io(parent, e))?;
            Ok(parent.to_path_buf())
        }
        _ => Ok(PathBuf::from(".")),
    }
}

/// Write `data` next to `path` in a temporary file, flushed to disk
fn stage(path: &Path, data: &[u8]) -> Result<NamedTempFile> {
    let dir = ensure_parent_dir(path)?;
    let mut staged = NamedTempFile::new_in(&dir).map_err(|e| HybridError::io(&dir, e))?;
    staged.write_all(data).map_err(|e| HybridError::io(path, e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| HybridError::io(path, e))?;
    Ok(staged)
}

/// Atomically write `data` to `path`, replacing any existing file.
///
/// The destination either keeps its previous state or holds the full new
/// contents; a failure never leaves a truncated file behind.
pub fn write_replacing(path: &Path, data: &[u8]) -> Result<()> {
    stage(path, data)?
        .persist(path)
        .map_err(|e| HybridError::io(path, e.error))?;
    Ok(())
}

/// Atomically write `data` to `path` only if nothing exists there yet.
///
/// Returns `false` without touching the destination when it already exists.
pub fn write_new(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    match stage(path, data)?.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == IoErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(HybridError::io(path, e.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.bin");

        let result = read_existing(&path);
        assert!(matches!(result, Err(HybridError::FileMissing { path: p }) if p == path));
    }

    #[test]
    fn test_require_file_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            require_file(temp_dir.path()),
            Err(HybridError::FileMissing { .. })
        ));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("out.bin");

        write_replacing(&path, b"contents").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"contents");
    }

    #[test]
    fn test_write_replacing_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.bin");

        write_replacing(&path, b"first").unwrap();
        write_replacing(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_write_new_keeps_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("key.bin");

        assert!(write_new(&path, b"first").unwrap());
        assert!(!write_new(&path, b"second").unwrap());
        assert_eq!(fs::read(&path).unwrap(), b"first");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.bin");

        write_replacing(&path, b"data").unwrap();
        write_new(&temp_dir.path().join("key.bin"), b"key").unwrap();

        let entries = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }
}
