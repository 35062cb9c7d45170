//! Get command implementation.

use super::{handle_at, open_existing, CommandResult};
use docstore_codec::serialize_pretty;
use docstore_core::{DocumentTransaction, Format, Path};

/// Prints the value at `target` as JSON.
pub fn run(file: &std::path::Path, format: Format, target: &str) -> CommandResult {
    let target: Path = target.parse()?;
    let store = open_existing(file, format)?;

    let mut txn = store.begin()?;
    let handle = handle_at(&mut txn, &target)?;
    let value = txn.get_value(handle)?;
    txn.rollback();

    println!("{}", serialize_pretty(&value)?);
    Ok(())
}
