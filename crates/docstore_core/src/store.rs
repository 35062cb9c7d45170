//! Committed document and its persistence.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::transaction::{DocumentTransaction, Transaction};
use crate::types::{TransactionId, Version};
use docstore_codec::{CodecError, Value, ValueKind};
use docstore_storage::{FileBackend, InMemoryBackend, StorageBackend};
use parking_lot::{Mutex, RwLock};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// A deep copy of the committed document and the version it was taken at.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The committed document.
    pub document: Value,
    /// Version of the committed document.
    pub version: Version,
}

/// Source and sink of committed documents for transactions.
///
/// [`Transaction`] only talks to this trait, so a transaction works the same
/// against every store, whatever format or backend sits underneath.
pub trait DocumentStore: Send + Sync {
    /// Returns a private copy of the committed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot produce a document.
    fn snapshot(&self) -> CoreResult<Snapshot>;

    /// Replaces the committed document with `document`.
    ///
    /// `base` is the version the caller's copy was taken from. Either the
    /// whole document becomes visible or nothing changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or persisted, or
    /// if the store rejects an outdated base.
    fn publish(&self, document: &Value, base: Version) -> CoreResult<Version>;

    /// Allocates a fresh transaction ID.
    fn next_transaction_id(&self) -> TransactionId;
}

#[derive(Debug)]
struct Committed {
    document: Value,
    version: Version,
}

/// A committed document backed by a storage backend.
///
/// Readers and beginning transactions take the read lock and copy the
/// document. Publishing persists the new document and swaps it in while
/// holding the write lock, so a snapshot is always either the old or the
/// new document.
///
/// # Example
///
/// ```rust
/// use docstore_core::{DocumentTransaction, Store};
///
/// let store = Store::open_in_memory().unwrap();
/// let mut txn = store.begin().unwrap();
/// let root = txn.root().unwrap();
/// txn.make_int(root, "port", 8080).unwrap();
/// txn.commit().unwrap();
///
/// assert_eq!(store.version().as_u64(), 1);
/// ```
pub struct Store {
    config: StoreConfig,
    committed: RwLock<Committed>,
    backend: Mutex<Box<dyn StorageBackend>>,
    next_txid: AtomicU64,
}

impl Store {
    /// Opens a store over `backend`.
    ///
    /// A backend that holds a blob is decoded with `config.format`; an empty
    /// backend yields an empty document when `create_if_missing` is set.
    /// Nothing is written until the first commit.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the backend is empty and `create_if_missing` is false
    /// - the backend holds a blob and `error_if_exists` is true
    /// - the blob cannot be decoded, or its root is not an object
    /// - the backend fails to load
    pub fn open(config: StoreConfig, backend: Box<dyn StorageBackend>) -> CoreResult<Self> {
        let (document, loaded) = match backend.load()? {
            Some(bytes) => {
                if config.error_if_exists {
                    return Err(CoreError::invalid_operation(
                        "document already exists and error_if_exists is true",
                    ));
                }
                (config.format.decode(&bytes)?, bytes.len())
            }
            None => {
                if !config.create_if_missing {
                    return Err(CoreError::invalid_operation(
                        "document does not exist and create_if_missing is false",
                    ));
                }
                (Value::object(), 0)
            }
        };

        if document.kind() != ValueKind::Object {
            return Err(CodecError::invalid_structure(format!(
                "document root must be an object, found {}",
                document.kind()
            ))
            .into());
        }

        tracing::info!(format = %config.format, bytes = loaded, "store opened");

        Ok(Self {
            config,
            committed: RwLock::new(Committed {
                document,
                version: Version::default(),
            }),
            backend: Mutex::new(backend),
            next_txid: AtomicU64::new(1),
        })
    }

    /// Puts `previous` back on the backend after a replace whose sync failed.
    fn restore(&self, backend: &mut dyn StorageBackend, previous: &Value) {
        let outcome = self
            .config
            .format
            .encode(previous, self.config.pretty)
            .map_err(CoreError::from)
            .and_then(|bytes| backend.replace(&bytes).map_err(CoreError::from));
        match outcome {
            Ok(()) => tracing::warn!("sync failed, previous document restored"),
            Err(err) => {
                tracing::error!(error = %err, "sync failed and previous document not restored");
            }
        }
    }

    /// Opens a store persisted in the file at `path`.
    ///
    /// Parent directories are created as needed. The file is locked for as
    /// long as the store is open.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Storage`] if the file is locked by another store
    /// or cannot be accessed, plus the errors of [`Store::open`].
    pub fn open_path(path: &Path, config: StoreConfig) -> CoreResult<Self> {
        let backend = FileBackend::open_with_create_dirs(path)?;
        Self::open(config, Box::new(backend))
    }

    /// Opens a fresh in-memory store holding an empty document.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::open(StoreConfig::default(), Box::new(InMemoryBackend::new()))
    }

    /// Opens an in-memory store whose committed document is `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if `document` is not an object or cannot be encoded.
    pub fn with_document(document: Value) -> CoreResult<Self> {
        let config = StoreConfig::default();
        let bytes = config.format.encode(&document, config.pretty)?;
        Self::open(config, Box::new(InMemoryBackend::with_data(bytes)))
    }

    /// Begins a new transaction.
    pub fn begin(&self) -> CoreResult<Transaction<'_>> {
        Transaction::begin(self)
    }

    /// Executes a function within a transaction.
    ///
    /// If the function returns `Ok`, the transaction is committed.
    /// If it returns `Err`, the transaction is rolled back.
    pub fn transaction<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Transaction<'_>) -> CoreResult<T>,
    {
        let mut txn = self.begin()?;
        match f(&mut txn) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(err) => {
                txn.rollback();
                Err(err)
            }
        }
    }

    /// Returns a copy of the committed document.
    #[must_use]
    pub fn document(&self) -> Value {
        self.committed.read().document.clone()
    }

    /// Returns the committed version.
    #[must_use]
    pub fn version(&self) -> Version {
        self.committed.read().version
    }

    /// Returns the store's configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Size of the persisted snapshot in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot report its size.
    pub fn persisted_size(&self) -> CoreResult<u64> {
        Ok(self.backend.lock().size()?)
    }
}

impl DocumentStore for Store {
    fn snapshot(&self) -> CoreResult<Snapshot> {
        let committed = self.committed.read();
        Ok(Snapshot {
            document: committed.document.clone(),
            version: committed.version,
        })
    }

    fn publish(&self, document: &Value, base: Version) -> CoreResult<Version> {
        let mut committed = self.committed.write();

        if self.config.detect_conflicts && base != committed.version {
            return Err(CoreError::Conflict {
                base,
                current: committed.version,
            });
        }

        let bytes = self.config.format.encode(document, self.config.pretty)?;
        {
            let mut backend = self.backend.lock();
            backend.replace(&bytes)?;
            if self.config.sync_on_commit {
                if let Err(err) = backend.sync() {
                    self.restore(&mut **backend, &committed.document);
                    return Err(err.into());
                }
            }
        }

        committed.document = document.clone();
        committed.version = committed.version.next();
        tracing::debug!(
            version = committed.version.as_u64(),
            bytes = bytes.len(),
            "document published"
        );
        Ok(committed.version)
    }

    fn next_transaction_id(&self) -> TransactionId {
        TransactionId::new(self.next_txid.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use docstore_codec::{parse, Format};

    #[test]
    fn open_in_memory_is_empty_object() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.document(), Value::object());
        assert_eq!(store.version(), Version::default());
    }

    #[test]
    fn open_decodes_existing_blob() {
        let backend = InMemoryBackend::with_data(br#"{"a":[1,2]}"#.to_vec());
        let store = Store::open(StoreConfig::default(), Box::new(backend)).unwrap();
        assert_eq!(store.document(), parse(r#"{"a":[1,2]}"#).unwrap());
    }

    #[test]
    fn open_respects_existence_flags() {
        let err = Store::open(
            StoreConfig::new().create_if_missing(false),
            Box::new(InMemoryBackend::new()),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);

        let err = Store::open(
            StoreConfig::new().error_if_exists(true),
            Box::new(InMemoryBackend::with_data(b"{}".to_vec())),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn open_rejects_non_object_root() {
        let backend = InMemoryBackend::with_data(b"[1]".to_vec());
        let err = Store::open(StoreConfig::default(), Box::new(backend)).unwrap_err();
        assert!(matches!(err, CoreError::Codec(_)));

        let err = Store::with_document(Value::Integer(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }

    #[test]
    fn publish_persists_and_bumps_version() {
        let observer = InMemoryBackend::new();
        let store = Store::open(
            StoreConfig::new().pretty(false),
            Box::new(observer.clone()),
        )
        .unwrap();

        let doc = parse(r#"{"port":8080}"#).unwrap();
        let version = store.publish(&doc, Version::default()).unwrap();
        assert_eq!(version, Version::new(1));
        assert_eq!(store.document(), doc);
        assert_eq!(observer.data().unwrap(), br#"{"port":8080}"#.to_vec());
        assert_eq!(store.persisted_size().unwrap(), 13);
    }

    #[test]
    fn publish_failure_leaves_store_unchanged() {
        let observer = InMemoryBackend::new();
        let store = Store::open(StoreConfig::default(), Box::new(observer.clone())).unwrap();
        observer.set_read_only(true);

        let doc = parse(r#"{"port":8080}"#).unwrap();
        let err = store.publish(&doc, Version::default()).unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
        assert_eq!(store.document(), Value::object());
        assert_eq!(store.version(), Version::default());
    }

    #[test]
    fn outdated_base_is_a_conflict_when_detecting() {
        let store = Store::open(
            StoreConfig::new().detect_conflicts(true),
            Box::new(InMemoryBackend::new()),
        )
        .unwrap();
        store.publish(&Value::object(), Version::default()).unwrap();

        let err = store.publish(&Value::object(), Version::default()).unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
        assert_eq!(store.version(), Version::new(1));
    }

    #[test]
    fn cbor_format_round_trips_through_backend() {
        let observer = InMemoryBackend::new();
        let config = StoreConfig::new().format(Format::Cbor);
        let store = Store::open(config.clone(), Box::new(observer.clone())).unwrap();
        let doc = parse(r#"{"name":"x","ratio":1.5}"#).unwrap();
        store.publish(&doc, Version::default()).unwrap();
        drop(store);

        let reopened = Store::open(config, Box::new(observer)).unwrap();
        assert_eq!(reopened.document(), doc);
    }

    #[test]
    fn transaction_helper_commits_or_rolls_back() {
        let store = Store::open_in_memory().unwrap();

        store
            .transaction(|txn| {
                let root = txn.root()?;
                txn.make_int(root, "a", 1)
            })
            .unwrap();
        assert_eq!(store.version(), Version::new(1));

        let err = store
            .transaction(|txn| {
                let root = txn.root()?;
                txn.make_int(root, "b", 2)?;
                txn.make_int(root, "a", 3)
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyExists);
        assert_eq!(store.document(), parse(r#"{"a":1}"#).unwrap());
        assert_eq!(store.version(), Version::new(1));
    }

    #[test]
    fn transaction_ids_increase() {
        let store = Store::open_in_memory().unwrap();
        let a = store.next_transaction_id();
        let b = store.next_transaction_id();
        assert!(a < b);
    }
}
