//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Slot {
    data: Option<Vec<u8>>,
    read_only: bool,
    replace_count: u64,
}

/// An in-memory storage backend.
///
/// This backend keeps the blob in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Clones share the same slot, so a test can hand one clone to a store and
/// keep another to inspect what the store wrote.
///
/// # Example
///
/// ```rust
/// use docstore_storage::{StorageBackend, InMemoryBackend};
///
/// let observer = InMemoryBackend::new();
/// let mut backend = observer.clone();
/// backend.replace(b"data").unwrap();
/// assert_eq!(observer.data().as_deref(), Some(&b"data"[..]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    slot: Arc<RwLock<Slot>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend holding `data`.
    ///
    /// Useful for testing how a store loads pre-existing documents.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        let backend = Self::default();
        backend.slot.write().data = Some(data);
        backend
    }

    /// Returns a copy of the stored blob.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.slot.read().data.clone()
    }

    /// Number of successful `replace` calls.
    #[must_use]
    pub fn replace_count(&self) -> u64 {
        self.slot.read().replace_count
    }

    /// Makes every subsequent `replace` fail with [`StorageError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.slot.write().read_only = read_only;
    }

    /// Drops the stored blob.
    pub fn clear(&self) {
        self.slot.write().data = None;
    }
}

impl StorageBackend for InMemoryBackend {
    fn load(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data())
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut slot = self.slot.write();
        if slot.read_only {
            return Err(StorageError::ReadOnly);
        }
        slot.data = Some(data.to_vec());
        slot.replace_count += 1;
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        // Nothing to make durable
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self
            .slot
            .read()
            .data
            .as_ref()
            .map_or(0, |data| data.len() as u64))
    }
}
