//! Set command implementation.

use super::{handle_at, open_existing, split_last, CommandResult};
use docstore_codec::parse;
use docstore_core::{
    CoreError, CoreResult, DocumentTransaction, Format, Handle, Path, PathSegment, Value,
};
use tracing::debug;

/// Where a new value goes.
enum Slot<'a> {
    /// Under a key of an object.
    Key(&'a str),
    /// Appended to an array.
    Push,
}

/// Writes the JSON value `json` at `target`.
///
/// The parent of `target` must exist. A scalar of the same kind is
/// overwritten in place; any other existing object entry is replaced.
/// An array index may name an existing element or the position just past
/// the end.
pub fn run(file: &std::path::Path, format: Format, target: &str, json: &str) -> CommandResult {
    let target: Path = target.parse()?;
    let value = parse(json)?;
    let (parent_path, last) = split_last(&target)?;
    let store = open_existing(file, format)?;

    let mut txn = store.begin()?;
    let parent = handle_at(&mut txn, &parent_path)?;
    match last {
        PathSegment::Key(key) => set_key(&mut txn, parent, &key, value)?,
        PathSegment::Index(idx) => set_index(&mut txn, parent, idx, value)?,
    }
    let version = txn.commit()?;

    debug!(%version, "set {}", target);
    println!("✓ Set {target}");
    Ok(())
}

fn set_key(
    txn: &mut dyn DocumentTransaction,
    parent: Handle,
    key: &str,
    value: Value,
) -> CoreResult<()> {
    if txn.has(parent, key)? {
        let existing = txn.child(parent, key)?;
        if overwrite_scalar(txn, existing, &value)? {
            return Ok(());
        }
        txn.remove(parent, key)?;
    }
    write(txn, parent, Slot::Key(key), value)
}

fn set_index(
    txn: &mut dyn DocumentTransaction,
    parent: Handle,
    index: usize,
    value: Value,
) -> CoreResult<()> {
    if index == txn.len(parent)? {
        return write(txn, parent, Slot::Push, value);
    }
    let existing = txn.element(parent, index)?;
    if overwrite_scalar(txn, existing, &value)? {
        return Ok(());
    }
    Err(CoreError::invalid_operation(format!(
        "element {} is a {} and cannot be replaced by a {}",
        txn.path(existing)?,
        txn.kind(existing)?,
        value.kind()
    )))
}

/// Overwrites `handle` in place when it holds a scalar of `value`'s kind.
fn overwrite_scalar(
    txn: &mut dyn DocumentTransaction,
    handle: Handle,
    value: &Value,
) -> CoreResult<bool> {
    if txn.kind(handle)? != value.kind() {
        return Ok(false);
    }
    match value {
        Value::Bool(b) => txn.set_bool(handle, *b)?,
        Value::Integer(n) => txn.set_int(handle, *n)?,
        Value::Float(f) => txn.set_double(handle, *f)?,
        Value::Text(s) => txn.set_string(handle, s)?,
        Value::Array(_) | Value::Object(_) => return Ok(false),
    }
    Ok(true)
}

/// Builds `value` at `slot` under `parent` through the handle API.
fn write(
    txn: &mut dyn DocumentTransaction,
    parent: Handle,
    slot: Slot<'_>,
    value: Value,
) -> CoreResult<()> {
    match (slot, value) {
        (Slot::Key(key), Value::Bool(b)) => txn.make_bool(parent, key, b),
        (Slot::Key(key), Value::Integer(n)) => txn.make_int(parent, key, n),
        (Slot::Key(key), Value::Float(f)) => txn.make_double(parent, key, f),
        (Slot::Key(key), Value::Text(s)) => txn.make_string(parent, key, &s),
        (Slot::Push, Value::Bool(b)) => txn.push_bool(parent, b),
        (Slot::Push, Value::Integer(n)) => txn.push_int(parent, n),
        (Slot::Push, Value::Float(f)) => txn.push_double(parent, f),
        (Slot::Push, Value::Text(s)) => txn.push_string(parent, &s),
        (slot, Value::Array(items)) => {
            let array = match slot {
                Slot::Key(key) => txn.make_array(parent, key)?,
                Slot::Push => txn.push_array(parent)?,
            };
            for item in items {
                write(txn, array, Slot::Push, item)?;
            }
            Ok(())
        }
        (slot, Value::Object(entries)) => {
            let object = match slot {
                Slot::Key(key) => txn.make_object(parent, key)?,
                Slot::Push => txn.push_object(parent)?,
            };
            for (key, item) in entries {
                write(txn, object, Slot::Key(&key), item)?;
            }
            Ok(())
        }
    }
}
