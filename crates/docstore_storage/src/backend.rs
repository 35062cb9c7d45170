//! Storage backend trait definition.

use crate::error::StorageResult;

/// A snapshot storage backend for DocStore.
///
/// # Invariants
///
/// - `load` returns exactly the bytes of the last successful `replace`, or
///   `None` if nothing was ever stored
/// - A failed `replace` leaves the previous blob in place
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the stored blob.
    ///
    /// Returns `None` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn load(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the stored blob with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written. The previous blob is
    /// left untouched in that case.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Syncs the stored blob and its metadata to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Returns the size of the stored blob in bytes (0 when empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}
