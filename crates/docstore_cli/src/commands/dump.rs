//! Dump command implementation.

use super::{open_existing, CommandResult};
use docstore_codec::serialize_pretty;
use docstore_core::Format;
use std::path::Path;

/// Pretty-prints the whole document.
pub fn run(file: &Path, format: Format) -> CommandResult {
    let store = open_existing(file, format)?;
    println!("{}", serialize_pretty(&store.document())?);
    Ok(())
}
