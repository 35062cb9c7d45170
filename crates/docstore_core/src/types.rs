//! Core type definitions for DocStore.

use std::fmt;

/// Unique identifier for a transaction.
///
/// Transaction IDs are monotonically increasing per store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Creates a new transaction ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// Commit counter of a store.
///
/// A freshly opened store is at version 0; every accepted commit
/// increments it by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(pub u64);

impl Version {
    /// Creates a new version.
    #[must_use]
    pub const fn new(version: u64) -> Self {
        Self(version)
    }

    /// Returns the raw version value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next version.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Opaque reference to a node inside one transaction's document.
///
/// A handle names a slot in its transaction's handle table, which in turn
/// records the node's path. Slots are minted from 1 upwards and never
/// reused; slot 0 is never minted, so [`Handle::from_parts`] with slot 0
/// always yields an invalid handle. A handle presented to any transaction
/// other than the one that minted it is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    txn: TransactionId,
    slot: u64,
}

impl Handle {
    /// The reserved slot number that is never minted.
    pub const RESERVED_SLOT: u64 = 0;

    /// Rebuilds a handle from its parts, e.g. after passing it through an
    /// RPC boundary as two integers.
    #[must_use]
    pub const fn from_parts(txn: TransactionId, slot: u64) -> Self {
        Self { txn, slot }
    }

    /// The transaction that minted this handle.
    #[must_use]
    pub const fn transaction(self) -> TransactionId {
        self.txn
    }

    /// The slot number within the transaction's handle table.
    #[must_use]
    pub const fn slot(self) -> u64 {
        self.slot
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.slot, self.txn)
    }
}
