//! Transaction state.

use super::handles::HandleTable;
use crate::error::{CoreError, CoreResult};
use crate::navigator;
use crate::store::DocumentStore;
use crate::types::{Handle, TransactionId, Version};
use docstore_codec::{CodecError, Path, Value, ValueKind, MAX_DEPTH};
use std::fmt;

/// State of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is active and can perform operations.
    Active,
    /// Transaction has been committed.
    Committed,
    /// Transaction has been rolled back.
    RolledBack,
}

/// A unit of work over a private copy of a store's document.
///
/// The copy is taken when the transaction begins. Edits stay invisible to
/// the store and to every other transaction until [`commit`] publishes the
/// whole document at once. Nodes are reached through [`Handle`]s, which are
/// only meaningful to the transaction that minted them.
///
/// Dropping an active transaction rolls it back.
///
/// [`commit`]: crate::DocumentTransaction::commit
pub struct Transaction<'s> {
    /// Transaction ID.
    id: TransactionId,
    /// Store the document came from and is published to.
    store: &'s dyn DocumentStore,
    /// Committed version the working copy was taken from.
    base_version: Version,
    /// Current state.
    state: TransactionState,
    /// Working copy of the document.
    document: Value,
    /// Handles minted so far.
    handles: HandleTable,
    /// Cached handle for the root.
    root: Option<Handle>,
}

impl<'s> Transaction<'s> {
    /// Begins a transaction against `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot produce a snapshot.
    pub fn begin(store: &'s dyn DocumentStore) -> CoreResult<Self> {
        let snapshot = store.snapshot()?;
        let id = store.next_transaction_id();
        tracing::debug!(txid = id.as_u64(), base = snapshot.version.as_u64(), "transaction begin");
        Ok(Self {
            id,
            store,
            base_version: snapshot.version,
            state: TransactionState::Active,
            document: snapshot.document,
            handles: HandleTable::new(id),
            root: None,
        })
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the version this transaction's copy was taken from.
    #[must_use]
    pub fn base_version(&self) -> Version {
        self.base_version
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Checks if the transaction is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == TransactionState::Active
    }

    /// Number of handles minted so far.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Checks that the transaction is active.
    pub(crate) fn ensure_active(&self) -> CoreResult<()> {
        if self.state != TransactionState::Active {
            return Err(CoreError::TransactionClosed {
                id: self.id,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Returns the handle for the root, minting it on first use.
    pub(crate) fn root_handle(&mut self) -> CoreResult<Handle> {
        self.ensure_active()?;
        if let Some(root) = self.root {
            return Ok(root);
        }
        let root = self.handles.mint(Path::root());
        self.root = Some(root);
        Ok(root)
    }

    /// Mints a handle for `path`.
    pub(crate) fn mint(&mut self, path: Path) -> Handle {
        self.handles.mint(path)
    }

    /// Returns the path bound to `handle` after checking that it still
    /// resolves.
    pub(crate) fn live_path(&self, handle: Handle) -> CoreResult<Path> {
        self.node(handle)?;
        self.handles.path_of(handle).cloned()
    }

    /// Returns the path bound to `handle` without resolving it.
    pub(crate) fn bound_path(&self, handle: Handle) -> CoreResult<&Path> {
        self.ensure_active()?;
        self.handles.path_of(handle)
    }

    /// Resolves `handle` in the working document.
    pub(crate) fn node(&self, handle: Handle) -> CoreResult<&Value> {
        self.ensure_active()?;
        let path = self.handles.path_of(handle)?;
        navigator::resolve(&self.document, path).map_err(|_| CoreError::StaleHandle {
            handle,
            path: path.clone(),
        })
    }

    /// Resolves `handle` in the working document, mutably.
    pub(crate) fn node_mut(&mut self, handle: Handle) -> CoreResult<&mut Value> {
        self.ensure_active()?;
        let path = self.handles.path_of(handle)?;
        navigator::resolve_mut(&mut self.document, path).map_err(|_| CoreError::StaleHandle {
            handle,
            path: path.clone(),
        })
    }

    /// Resolves `handle` and checks that it addresses a node of `expected`
    /// kind.
    pub(crate) fn node_of_kind(&self, handle: Handle, expected: ValueKind) -> CoreResult<&Value> {
        let node = self.node(handle)?;
        if node.kind() != expected {
            return Err(self.mismatch(handle, expected, node.kind()));
        }
        Ok(node)
    }

    /// Builds a type mismatch error for the node `handle` addresses.
    pub(crate) fn mismatch(
        &self,
        handle: Handle,
        expected: ValueKind,
        actual: ValueKind,
    ) -> CoreError {
        let path = self.handles.path_of(handle).cloned().unwrap_or_default();
        CoreError::type_mismatch(path, expected, actual)
    }

    /// Working document, for structural edits through the navigator.
    pub(crate) fn document_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    /// Publishes the working document.
    pub(crate) fn commit_inner(&mut self) -> CoreResult<Version> {
        self.ensure_active()?;

        let depth = self.document.depth();
        if depth > MAX_DEPTH {
            let err = CoreError::from(CodecError::DepthLimitExceeded {
                max_depth: MAX_DEPTH,
            });
            tracing::warn!(txid = self.id.as_u64(), depth, error = %err, "commit failed");
            return Err(err);
        }

        match self.store.publish(&self.document, self.base_version) {
            Ok(version) => {
                tracing::debug!(
                    txid = self.id.as_u64(),
                    base = self.base_version.as_u64(),
                    version = version.as_u64(),
                    "transaction committed"
                );
                self.state = TransactionState::Committed;
                self.discard();
                Ok(version)
            }
            Err(err) => {
                tracing::warn!(txid = self.id.as_u64(), error = %err, "commit failed");
                Err(err)
            }
        }
    }

    /// Abandons the working document. Does nothing once terminal.
    pub(crate) fn rollback_inner(&mut self) {
        if self.state != TransactionState::Active {
            return;
        }
        tracing::debug!(txid = self.id.as_u64(), "transaction rolled back");
        self.state = TransactionState::RolledBack;
        self.discard();
    }

    fn discard(&mut self) {
        self.document = Value::object();
        self.handles.clear();
        self.root = None;
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("base_version", &self.base_version)
            .field("state", &self.state)
            .field("handles", &self.handles.len())
            .finish_non_exhaustive()
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.is_active() {
            tracing::debug!(txid = self.id.as_u64(), "implicit rollback on drop");
            self.rollback_inner();
        }
    }
}
