//! Store configuration.

use docstore_codec::Format;

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Whether an empty backend may be initialized with an empty document.
    pub create_if_missing: bool,

    /// Whether to error if the backend already holds a document.
    pub error_if_exists: bool,

    /// Encoding used at the persistence boundary.
    pub format: Format,

    /// Whether JSON snapshots are written pretty-printed.
    pub pretty: bool,

    /// Whether to sync the backend after every commit (safer but slower).
    pub sync_on_commit: bool,

    /// Whether a commit based on an outdated version is rejected.
    pub detect_conflicts: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            error_if_exists: false,
            format: Format::Json,
            pretty: true,
            sync_on_commit: true,
            detect_conflicts: false,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the document if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to error if a document exists.
    #[must_use]
    pub const fn error_if_exists(mut self, value: bool) -> Self {
        self.error_if_exists = value;
        self
    }

    /// Sets the snapshot encoding.
    #[must_use]
    pub const fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets whether JSON snapshots are pretty-printed.
    #[must_use]
    pub const fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Sets whether to sync on every commit.
    #[must_use]
    pub const fn sync_on_commit(mut self, value: bool) -> Self {
        self.sync_on_commit = value;
        self
    }

    /// Sets whether outdated commits are rejected.
    #[must_use]
    pub const fn detect_conflicts(mut self, value: bool) -> Self {
        self.detect_conflicts = value;
        self
    }
}
