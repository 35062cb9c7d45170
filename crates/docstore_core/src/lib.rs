//! # DocStore Core
//!
//! Transactional, handle-based access to a hierarchical document.
//!
//! This crate provides:
//! - [`Store`]: the committed document, persisted through a storage backend
//! - [`Transaction`]: a private working copy, published whole on commit
//! - [`DocumentTransaction`]: the handle-based accessor surface
//! - [`navigator`]: path resolution and structural edits on a value tree
//!
//! ## Example
//!
//! ```rust
//! use docstore_core::{DocumentTransaction, Store};
//!
//! let store = Store::open_in_memory().unwrap();
//!
//! let mut txn = store.begin().unwrap();
//! let root = txn.root().unwrap();
//! let server = txn.make_object(root, "server").unwrap();
//! txn.make_int(server, "port", 8080).unwrap();
//! txn.commit().unwrap();
//!
//! let mut txn = store.begin().unwrap();
//! let root = txn.root().unwrap();
//! let server = txn.child(root, "server").unwrap();
//! let port = txn.child(server, "port").unwrap();
//! assert_eq!(txn.get_int(port).unwrap(), 8080);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod navigator;
mod store;
mod transaction;
mod types;

pub use config::StoreConfig;
pub use error::{CoreError, CoreResult, ErrorKind};
pub use store::{DocumentStore, Snapshot, Store};
pub use transaction::{DocumentTransaction, HandleTable, Transaction, TransactionState};
pub use types::{Handle, TransactionId, Version};

pub use docstore_codec::{Format, Path, PathSegment, Value, ValueKind};
