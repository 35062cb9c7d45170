//! # DocStore Testkit
//!
//! Test utilities for DocStore.
//!
//! This crate provides:
//! - Test fixtures and store helpers
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use docstore_core::DocumentTransaction;
//! use docstore_testkit::prelude::*;
//!
//! let test_store = TestStore::memory();
//! let mut txn = test_store.begin().unwrap();
//! let root = txn.root().unwrap();
//! txn.make_string(root, "name", "demo").unwrap();
//! txn.commit().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
