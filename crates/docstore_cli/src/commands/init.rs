//! Init command implementation.

use super::CommandResult;
use docstore_core::{DocumentTransaction, Format, Store, StoreConfig};
use std::path::Path;
use tracing::info;

/// Creates an empty document at `path`.
///
/// Fails if a document already exists there.
pub fn run(path: &Path, format: Format) -> CommandResult {
    let config = StoreConfig::new().format(format).error_if_exists(true);
    let store = Store::open_path(path, config)?;

    let mut txn = store.begin()?;
    txn.commit()?;

    info!("Initialized {} document at {:?}", format, path);
    println!("✓ Created {}", path.display());
    Ok(())
}
