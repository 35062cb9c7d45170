//! # DocStore Storage
//!
//! Storage backend trait and implementations for DocStore.
//!
//! Backends are **opaque snapshot stores**: they hold one blob, the most
//! recently persisted document, and can hand it back or replace it whole.
//! They know nothing about the document format.
//!
//! ## Design Principles
//!
//! - A backend holds at most one blob
//! - `replace` swaps the blob atomically; readers see old or new bytes
//! - Must be `Send + Sync` so a store can be shared across threads
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use docstore_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert_eq!(backend.load().unwrap(), None);
//! backend.replace(b"{}").unwrap();
//! assert_eq!(backend.load().unwrap().as_deref(), Some(&b"{}"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
