//! Convert command implementation.

use super::{open_existing, CommandResult};
use docstore_core::Format;
use docstore_storage::{FileBackend, StorageBackend};
use std::path::Path;
use tracing::info;

/// Re-encodes the document at `file` into `output` using `to`.
pub fn run(file: &Path, format: Format, to: Format, output: &Path) -> CommandResult {
    let store = open_existing(file, format)?;
    let bytes = to.encode(&store.document(), store.config().pretty)?;

    let mut backend = FileBackend::open_with_create_dirs(output)?;
    backend.replace(&bytes)?;
    backend.sync()?;

    info!("Converted {:?} ({}) to {:?} ({})", file, format, output, to);
    println!("✓ Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}
