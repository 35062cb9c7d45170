//! Transactions over a private copy of the document.
//!
//! A transaction copies the committed document when it begins and works
//! on that copy alone:
//! - **Atomicity**: the whole working document is published at once, or not at all
//! - **Isolation**: concurrent transactions never see each other's edits
//! - **Durability**: publishing goes through the store's backend before it is visible

mod api;
mod handles;
mod state;

pub use api::DocumentTransaction;
pub use handles::HandleTable;
pub use state::{Transaction, TransactionState};
