//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// The blob lives in a single file. Replacement writes a temporary sibling
/// (`<file>.tmp`), syncs it and renames it over the target, so a reader or a
/// crash observes either the old or the new contents.
///
/// An advisory exclusive lock on `<file>.lock` is held for the lifetime of
/// the backend; a second backend on the same file fails to open with
/// [`StorageError::Locked`].
///
/// # Example
///
/// ```no_run
/// use docstore_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("config.json")).unwrap();
/// backend.replace(br#"{"port": 8080}"#).unwrap();
/// backend.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    _lock_file: File,
}

impl FileBackend {
    /// Opens a file backend at the given path.
    ///
    /// The data file itself is not created until the first `replace`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Locked`] if another backend holds the lock,
    /// or an I/O error if the lock file cannot be created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let lock_path = sibling(path, "lock");
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Opens a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the lock cannot
    /// be taken.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path to the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let tmp_path = sibling(&self.path, "tmp");
        let result = (|| -> io::Result<()> {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(data)?;
            tmp.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if result.is_err() {
            // Best effort; the target file is untouched either way.
            let _ = fs::remove_file(&tmp_path);
        }
        result.map_err(StorageError::from)
    }

    fn sync(&mut self) -> StorageResult<()> {
        match File::open(&self.path) {
            Ok(file) => file.sync_all()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        }
        sync_parent_dir(&self.path)
    }

    fn size(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

/// `<path>.<suffix>` next to `path`.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> StorageResult<()> {
    // Makes the rename in `replace` durable.
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        File::open(parent)?.sync_all()?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> StorageResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_open_does_not_create_data_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.load().unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn file_replace_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.replace(b"first").unwrap();
        backend.replace(b"second").unwrap();

        assert_eq!(backend.load().unwrap().unwrap(), b"second");
        assert_eq!(backend.size().unwrap(), 6);
        assert!(!sibling(&path, "tmp").exists());
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.replace(b"persistent data").unwrap();
            backend.sync().unwrap();
        }

        {
            let backend = FileBackend::open(&path).unwrap();
            assert_eq!(backend.load().unwrap().unwrap(), b"persistent data");
        }
    }

    #[test]
    fn file_lock_is_exclusive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let _first = FileBackend::open(&path).unwrap();
        let second = FileBackend::open(&path);
        assert!(matches!(second, Err(StorageError::Locked { .. })));
    }

    #[test]
    fn file_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        drop(FileBackend::open(&path).unwrap());
        assert!(FileBackend::open(&path).is_ok());
    }

    #[test]
    fn file_empty_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, b"").unwrap();

        let backend = FileBackend::open(&path).unwrap();
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn file_create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("doc.json");

        let mut backend = FileBackend::open_with_create_dirs(&path).unwrap();
        backend.replace(b"{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn file_sync_without_data_succeeds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let mut backend = FileBackend::open(&path).unwrap();
        assert!(backend.sync().is_ok());
    }

    #[test]
    fn file_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.path(), path);
    }
}
