//! Remove command implementation.

use super::{handle_at, open_existing, split_last, CommandResult};
use docstore_core::{DocumentTransaction, Format, Path, PathSegment};
use tracing::debug;

/// Removes the object key or array element at `target`.
pub fn run(file: &std::path::Path, format: Format, target: &str) -> CommandResult {
    let target: Path = target.parse()?;
    let (parent_path, last) = split_last(&target)?;
    let store = open_existing(file, format)?;

    let mut txn = store.begin()?;
    let parent = handle_at(&mut txn, &parent_path)?;
    match last {
        PathSegment::Key(key) => txn.remove(parent, &key)?,
        PathSegment::Index(idx) => txn.erase_element(parent, idx)?,
    }
    let version = txn.commit()?;

    debug!(%version, "removed {}", target);
    println!("✓ Removed {target}");
    Ok(())
}
