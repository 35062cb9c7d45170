//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use docstore_codec::{parse, Value};
use docstore_core::{Store, StoreConfig};
use docstore_storage::InMemoryBackend;
use std::path::PathBuf;
use tempfile::TempDir;

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: Store,
    /// Shared view of the in-memory backend, if memory-based.
    backend: Option<InMemoryBackend>,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a new in-memory test store.
    pub fn memory() -> Self {
        Self::memory_with_config(StoreConfig::default())
    }

    /// Creates a new in-memory test store with a custom configuration.
    pub fn memory_with_config(config: StoreConfig) -> Self {
        let backend = InMemoryBackend::new();
        let store =
            Store::open(config, Box::new(backend.clone())).expect("Failed to open in-memory store");
        Self {
            store,
            backend: Some(backend),
            temp_dir: None,
        }
    }

    /// Creates an in-memory test store whose committed document is parsed
    /// from `json`.
    pub fn with_json(json: &str) -> Self {
        let config = StoreConfig::default();
        let document = parse(json).expect("Failed to parse fixture document");
        let bytes = config
            .format
            .encode(&document, config.pretty)
            .expect("Failed to encode fixture document");
        let backend = InMemoryBackend::with_data(bytes);
        let store =
            Store::open(config, Box::new(backend.clone())).expect("Failed to open in-memory store");
        Self {
            store,
            backend: Some(backend),
            temp_dir: None,
        }
    }

    /// Creates a new file-based test store.
    pub fn file() -> Self {
        Self::file_with_config(StoreConfig::default())
    }

    /// Creates a new file-based test store with a custom configuration.
    pub fn file_with_config(config: StoreConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("document.json");
        let store = Store::open_path(&path, config).expect("Failed to open file store");
        Self {
            store,
            backend: None,
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the document path if file-based, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self.temp_dir
            .as_ref()
            .map(|d| d.path().join("document.json"))
    }

    /// Returns the in-memory backend shared with the store, if memory-based.
    pub fn backend(&self) -> Option<&InMemoryBackend> {
        self.backend.as_ref()
    }

    /// Returns the bytes the store last persisted.
    pub fn persisted_bytes(&self) -> Option<Vec<u8>> {
        match (&self.backend, self.path()) {
            (Some(backend), _) => backend.data(),
            (None, Some(path)) => std::fs::read(path).ok(),
            (None, None) => None,
        }
    }

    /// Returns the committed document.
    pub fn document(&self) -> Value {
        self.store.document()
    }
}

impl std::ops::Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```rust
/// use docstore_core::DocumentTransaction;
/// use docstore_testkit::with_temp_store;
///
/// with_temp_store(|store| {
///     let mut txn = store.begin().unwrap();
///     let root = txn.root().unwrap();
///     txn.make_bool(root, "ready", true).unwrap();
///     txn.commit().unwrap();
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&Store) -> R,
{
    let test_store = TestStore::memory();
    f(&test_store.store)
}

/// Runs a test with a temporary file-based store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&Store, &std::path::Path) -> R,
{
    let test_store = TestStore::file();
    let path = test_store.path().expect("File store should have a path");
    f(&test_store.store, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// A small service configuration document.
    pub const SERVICE_CONFIG: &str = r#"{
        "name": "gateway",
        "server": {
            "host": "0.0.0.0",
            "port": 8080,
            "tls": { "enabled": false }
        },
        "upstreams": ["alpha", "beta", "gamma", "delta"],
        "retry": { "attempts": 3, "backoff": 1.5 }
    }"#;

    /// Creates a store holding [`SERVICE_CONFIG`].
    pub fn service_config() -> TestStore {
        TestStore::with_json(SERVICE_CONFIG)
    }

    /// Creates a store whose root holds an array `items` of `count` integers.
    pub fn populated_array(count: usize) -> TestStore {
        let items: Vec<Value> = (0..count as i64).map(Value::Integer).collect();
        let document = Value::from_entries([("items", Value::Array(items))]);
        let json = docstore_codec::serialize(&document).expect("Failed to serialize fixture");
        TestStore::with_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstore_core::DocumentTransaction;

    #[test]
    fn memory_store_starts_empty() {
        let test_store = TestStore::memory();
        assert_eq!(test_store.document(), Value::object());
        assert_eq!(test_store.persisted_bytes(), None);
    }

    #[test]
    fn file_store_persists_commits() {
        let test_store = TestStore::file();
        let mut txn = test_store.begin().unwrap();
        let root = txn.root().unwrap();
        txn.make_int(root, "port", 1).unwrap();
        txn.commit().unwrap();

        let bytes = test_store.persisted_bytes().unwrap();
        assert_eq!(parse(std::str::from_utf8(&bytes).unwrap()).unwrap(), test_store.document());
    }

    #[test]
    fn service_config_scenario() {
        let test_store = scenarios::service_config();
        let doc = test_store.document();
        assert_eq!(doc.get("name"), Some(&Value::from("gateway")));
        assert_eq!(doc.get("upstreams").and_then(Value::len), Some(4));
    }

    #[test]
    fn populated_array_scenario() {
        let test_store = scenarios::populated_array(5);
        let doc = test_store.document();
        assert_eq!(doc.get("items").and_then(Value::len), Some(5));
    }
}
