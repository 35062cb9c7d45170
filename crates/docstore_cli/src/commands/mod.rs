//! CLI command implementations.

pub mod convert;
pub mod dump;
pub mod get;
pub mod init;
pub mod inspect;
pub mod remove;
pub mod set;

use docstore_core::{
    CoreResult, DocumentTransaction, Format, Handle, Path, PathSegment, Store, StoreConfig,
};

/// Result type shared by all commands.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Opens the document at `path`, which must already exist.
pub fn open_existing(path: &std::path::Path, format: Format) -> CoreResult<Store> {
    let config = StoreConfig::new().format(format).create_if_missing(false);
    Store::open_path(path, config)
}

/// Mints a handle for `path` by walking it from the root.
pub fn handle_at(txn: &mut dyn DocumentTransaction, path: &Path) -> CoreResult<Handle> {
    let mut handle = txn.root()?;
    for segment in path.segments() {
        handle = match segment {
            PathSegment::Key(key) => txn.child(handle, key)?,
            PathSegment::Index(idx) => txn.element(handle, *idx)?,
        };
    }
    Ok(handle)
}

/// Splits `path` into its parent and last segment.
pub fn split_last(path: &Path) -> Result<(Path, PathSegment), Box<dyn std::error::Error>> {
    match (path.parent(), path.last_segment()) {
        (Some(parent), Some(last)) => Ok((parent, last.clone())),
        _ => Err("the document root cannot be addressed here".into()),
    }
}
