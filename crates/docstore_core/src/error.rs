//! Error types for DocStore core.

use crate::transaction::TransactionState;
use crate::types::{Handle, TransactionId, Version};
use docstore_codec::{Path, ValueKind};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in DocStore core operations.
///
/// Every transaction operation reports failure through this type; use
/// [`CoreError::kind`] to branch on the category alone.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The handle was never minted by this transaction.
    #[error("invalid handle {handle}")]
    InvalidHandle {
        /// The rejected handle.
        handle: Handle,
    },

    /// The handle's path no longer resolves in the working document.
    #[error("stale handle {handle}: path '{path}' no longer resolves")]
    StaleHandle {
        /// The stale handle.
        handle: Handle,
        /// The path the handle was bound to.
        path: Path,
    },

    /// A looked-up key or index does not exist.
    #[error("no node at '{path}'")]
    NotFound {
        /// The missing node's path.
        path: Path,
    },

    /// The node at `path` has a different kind than the operation needs.
    #[error("type mismatch at '{path}': expected {expected}, found {actual}")]
    TypeMismatch {
        /// Path of the offending node.
        path: Path,
        /// Kind the operation required.
        expected: ValueKind,
        /// Kind actually present.
        actual: ValueKind,
    },

    /// Creating a child would overwrite an existing key.
    #[error("key already exists at '{path}'")]
    KeyExists {
        /// Path of the existing child.
        path: Path,
    },

    /// The key is empty or contains reserved path characters.
    #[error("invalid key {key:?}")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    /// The transaction has already been committed or rolled back.
    #[error("transaction {id} is closed ({state:?})")]
    TransactionClosed {
        /// The closed transaction.
        id: TransactionId,
        /// Its terminal state.
        state: TransactionState,
    },

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] docstore_storage::StorageError),

    /// Document codec error.
    #[error("codec error: {0}")]
    Codec(#[from] docstore_codec::CodecError),

    /// Another transaction committed since this one began.
    #[error("commit conflict: transaction based on {base}, store is at {current}")]
    Conflict {
        /// Version the transaction was opened from.
        base: Version,
        /// Version currently committed.
        current: Version,
    },

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

/// Category of a [`CoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Handle unknown to this transaction.
    InvalidHandle,
    /// Handle's path no longer resolves.
    StaleHandle,
    /// Key or index absent.
    NotFound,
    /// Node kind does not fit the operation.
    TypeMismatch,
    /// Creation would overwrite an existing key.
    KeyExists,
    /// Key fails validity rules.
    InvalidKey,
    /// Transaction already committed or rolled back.
    TransactionClosed,
    /// Failure of the store, its backend or its codec.
    Store,
    /// Store setup or usage error.
    InvalidOperation,
}

impl CoreError {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidHandle { .. } => ErrorKind::InvalidHandle,
            CoreError::StaleHandle { .. } => ErrorKind::StaleHandle,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            CoreError::KeyExists { .. } => ErrorKind::KeyExists,
            CoreError::InvalidKey { .. } => ErrorKind::InvalidKey,
            CoreError::TransactionClosed { .. } => ErrorKind::TransactionClosed,
            CoreError::Storage(_) | CoreError::Codec(_) | CoreError::Conflict { .. } => {
                ErrorKind::Store
            }
            CoreError::InvalidOperation { .. } => ErrorKind::InvalidOperation,
        }
    }

    /// Creates a not found error.
    pub fn not_found(path: Path) -> Self {
        Self::NotFound { path }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(path: Path, expected: ValueKind, actual: ValueKind) -> Self {
        Self::TypeMismatch {
            path,
            expected,
            actual,
        }
    }

    /// Creates a key exists error.
    pub fn key_exists(path: Path) -> Self {
        Self::KeyExists { path }
    }

    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_share_a_kind() {
        let codec = CoreError::from(docstore_codec::CodecError::NaNForbidden);
        let storage = CoreError::from(docstore_storage::StorageError::ReadOnly);
        let conflict = CoreError::Conflict {
            base: Version::new(1),
            current: Version::new(2),
        };
        assert_eq!(codec.kind(), ErrorKind::Store);
        assert_eq!(storage.kind(), ErrorKind::Store);
        assert_eq!(conflict.kind(), ErrorKind::Store);
    }

    #[test]
    fn messages_name_the_path() {
        let err = CoreError::type_mismatch(
            Path::root().key("port"),
            ValueKind::Integer,
            ValueKind::String,
        );
        assert_eq!(
            err.to_string(),
            "type mismatch at 'port': expected integer, found string"
        );
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }
}
