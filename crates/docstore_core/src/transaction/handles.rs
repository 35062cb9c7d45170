//! Per-transaction handle table.

use crate::error::{CoreError, CoreResult};
use crate::types::{Handle, TransactionId};
use docstore_codec::Path;
use std::collections::HashMap;

/// Maps the handles a transaction has handed out to the paths they name.
///
/// Entries are never removed while the transaction lives. A handle whose
/// path stops resolving is detected lazily by the caller.
#[derive(Debug)]
pub struct HandleTable {
    owner: TransactionId,
    next: u64,
    paths: HashMap<u64, Path>,
}

impl HandleTable {
    /// Creates an empty table for the given transaction.
    pub fn new(owner: TransactionId) -> Self {
        Self {
            owner,
            next: Handle::RESERVED_SLOT + 1,
            paths: HashMap::new(),
        }
    }

    /// Records `path` under a fresh slot.
    pub fn mint(&mut self, path: Path) -> Handle {
        let slot = self.next;
        self.next += 1;
        self.paths.insert(slot, path);
        Handle::from_parts(self.owner, slot)
    }

    /// Returns the path bound to `handle`.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidHandle`] for the reserved slot, for a handle
    /// minted by another transaction, or for a slot never minted here.
    pub fn path_of(&self, handle: Handle) -> CoreResult<&Path> {
        if handle.transaction() != self.owner {
            return Err(CoreError::InvalidHandle { handle });
        }
        self.paths
            .get(&handle.slot())
            .ok_or(CoreError::InvalidHandle { handle })
    }

    /// Number of minted handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if nothing has been minted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Forgets every handle. Slot numbers keep increasing afterwards.
    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn mint_starts_at_one() {
        let mut table = HandleTable::new(TransactionId::new(1));
        let h = table.mint(Path::root());
        assert_eq!(h.slot(), 1);
        assert_eq!(table.mint(Path::root().key("a")).slot(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn path_of_returns_recorded_path() {
        let mut table = HandleTable::new(TransactionId::new(1));
        let path = Path::root().key("servers").index(2);
        let h = table.mint(path.clone());
        assert_eq!(table.path_of(h).unwrap(), &path);
    }

    #[test]
    fn reserved_and_unknown_slots_are_invalid() {
        let owner = TransactionId::new(1);
        let mut table = HandleTable::new(owner);
        table.mint(Path::root());

        let zero = Handle::from_parts(owner, Handle::RESERVED_SLOT);
        assert_eq!(table.path_of(zero).unwrap_err().kind(), ErrorKind::InvalidHandle);

        let unknown = Handle::from_parts(owner, 99);
        assert_eq!(table.path_of(unknown).unwrap_err().kind(), ErrorKind::InvalidHandle);
    }

    #[test]
    fn foreign_handles_are_invalid() {
        let mut first = HandleTable::new(TransactionId::new(1));
        let second = HandleTable::new(TransactionId::new(2));
        let h = first.mint(Path::root());
        assert_eq!(second.path_of(h).unwrap_err().kind(), ErrorKind::InvalidHandle);
    }

    #[test]
    fn clear_does_not_reuse_slots() {
        let mut table = HandleTable::new(TransactionId::new(1));
        let old = table.mint(Path::root());
        table.clear();
        assert!(table.is_empty());
        assert!(table.path_of(old).is_err());
        assert_eq!(table.mint(Path::root()).slot(), 2);
    }
}
