//! The handle-based document accessor surface.

use super::state::Transaction;
use crate::error::{CoreError, CoreResult};
use crate::navigator;
use crate::types::{Handle, Version};
use docstore_codec::{is_valid_key, Path, Value, ValueKind};

/// Transactional access to a hierarchical document through handles.
///
/// All reads and writes go through [`Handle`]s minted by the same
/// transaction. A handle records the path of its node and is resolved
/// again on every call, so it survives edits elsewhere in the document and
/// goes stale once its path stops resolving.
///
/// Every operation fails with [`CoreError::TransactionClosed`] after
/// [`commit`](Self::commit) succeeds or [`rollback`](Self::rollback) runs.
/// A failed operation leaves the working document as it was.
///
/// The trait is object safe; callers that only need document access can
/// take `&mut dyn DocumentTransaction`.
pub trait DocumentTransaction {
    /// Handle for the document root. Repeated calls return the same handle.
    fn root(&mut self) -> CoreResult<Handle>;

    /// Reads a boolean.
    fn get_bool(&self, handle: Handle) -> CoreResult<bool>;
    /// Reads an integer.
    fn get_int(&self, handle: Handle) -> CoreResult<i64>;
    /// Reads a float. Integers are not widened.
    fn get_double(&self, handle: Handle) -> CoreResult<f64>;
    /// Reads a string.
    fn get_string(&self, handle: Handle) -> CoreResult<String>;

    /// Overwrites a boolean in place.
    fn set_bool(&mut self, handle: Handle, value: bool) -> CoreResult<()>;
    /// Overwrites an integer in place.
    fn set_int(&mut self, handle: Handle, value: i64) -> CoreResult<()>;
    /// Overwrites a float in place.
    fn set_double(&mut self, handle: Handle, value: f64) -> CoreResult<()>;
    /// Overwrites a string in place.
    fn set_string(&mut self, handle: Handle, value: &str) -> CoreResult<()>;

    /// Adds an empty object under `key` and returns its handle.
    fn make_object(&mut self, parent: Handle, key: &str) -> CoreResult<Handle>;
    /// Adds an empty array under `key` and returns its handle.
    fn make_array(&mut self, parent: Handle, key: &str) -> CoreResult<Handle>;
    /// Adds a boolean under `key`.
    fn make_bool(&mut self, parent: Handle, key: &str, value: bool) -> CoreResult<()>;
    /// Adds an integer under `key`.
    fn make_int(&mut self, parent: Handle, key: &str, value: i64) -> CoreResult<()>;
    /// Adds a float under `key`.
    fn make_double(&mut self, parent: Handle, key: &str, value: f64) -> CoreResult<()>;
    /// Adds a string under `key`.
    fn make_string(&mut self, parent: Handle, key: &str, value: &str) -> CoreResult<()>;

    /// Removes `key` and its subtree from an object.
    ///
    /// The key is validated like the `make_*` keys, before `parent` is
    /// resolved.
    fn remove(&mut self, parent: Handle, key: &str) -> CoreResult<()>;
    /// Returns whether an object contains `key`.
    fn has(&self, parent: Handle, key: &str) -> CoreResult<bool>;
    /// Removes element `index` from an array, shifting later elements down.
    fn erase_element(&mut self, parent: Handle, index: usize) -> CoreResult<()>;
    /// Returns whether an array has an element at `index`.
    fn has_element(&self, parent: Handle, index: usize) -> CoreResult<bool>;

    /// Mints a handle for an existing object entry.
    fn child(&mut self, parent: Handle, key: &str) -> CoreResult<Handle>;
    /// Mints a handle for an existing array element.
    fn element(&mut self, parent: Handle, index: usize) -> CoreResult<Handle>;

    /// Appends an empty object to an array and returns its handle.
    fn push_object(&mut self, array: Handle) -> CoreResult<Handle>;
    /// Appends an empty array to an array and returns its handle.
    fn push_array(&mut self, array: Handle) -> CoreResult<Handle>;
    /// Appends a boolean to an array.
    fn push_bool(&mut self, array: Handle, value: bool) -> CoreResult<()>;
    /// Appends an integer to an array.
    fn push_int(&mut self, array: Handle, value: i64) -> CoreResult<()>;
    /// Appends a float to an array.
    fn push_double(&mut self, array: Handle, value: f64) -> CoreResult<()>;
    /// Appends a string to an array.
    fn push_string(&mut self, array: Handle, value: &str) -> CoreResult<()>;

    /// Kind of the addressed node.
    fn kind(&self, handle: Handle) -> CoreResult<ValueKind>;
    /// Element count of an array or entry count of an object.
    fn len(&self, handle: Handle) -> CoreResult<usize>;
    /// Keys of an object, in document order.
    fn keys(&self, handle: Handle) -> CoreResult<Vec<String>>;
    /// Deep copy of the addressed subtree.
    fn get_value(&self, handle: Handle) -> CoreResult<Value>;
    /// Path bound to `handle`. The path is not resolved.
    fn path(&self, handle: Handle) -> CoreResult<Path>;

    /// Publishes the working document and closes the transaction.
    ///
    /// On failure the store is unchanged and the transaction stays active,
    /// so the caller may retry or roll back.
    fn commit(&mut self) -> CoreResult<Version>;
    /// Discards the working document. Does nothing if already closed.
    fn rollback(&mut self);
}

impl Transaction<'_> {
    fn read<T>(
        &self,
        handle: Handle,
        expected: ValueKind,
        extract: impl FnOnce(&Value) -> Option<T>,
    ) -> CoreResult<T> {
        let node = self.node(handle)?;
        extract(node).ok_or_else(|| self.mismatch(handle, expected, node.kind()))
    }

    fn write(&mut self, handle: Handle, value: Value) -> CoreResult<()> {
        let expected = value.kind();
        let actual = self.node(handle)?.kind();
        if actual != expected {
            return Err(self.mismatch(handle, expected, actual));
        }
        *self.node_mut(handle)? = value;
        Ok(())
    }

    fn insert(&mut self, parent: Handle, key: &str, value: Value) -> CoreResult<Path> {
        self.ensure_active()?;
        if !is_valid_key(key) {
            return Err(CoreError::invalid_key(key));
        }
        let path = self.live_path(parent)?;
        navigator::insert_child(self.document_mut(), &path, key, value)
    }

    fn append(&mut self, array: Handle, value: Value) -> CoreResult<Path> {
        let path = self.live_path(array)?;
        navigator::push_element(self.document_mut(), &path, value)
    }
}

impl DocumentTransaction for Transaction<'_> {
    fn root(&mut self) -> CoreResult<Handle> {
        self.root_handle()
    }

    fn get_bool(&self, handle: Handle) -> CoreResult<bool> {
        self.read(handle, ValueKind::Bool, Value::as_bool)
    }

    fn get_int(&self, handle: Handle) -> CoreResult<i64> {
        self.read(handle, ValueKind::Integer, Value::as_integer)
    }

    fn get_double(&self, handle: Handle) -> CoreResult<f64> {
        self.read(handle, ValueKind::Float, Value::as_float)
    }

    fn get_string(&self, handle: Handle) -> CoreResult<String> {
        self.read(handle, ValueKind::String, |v| v.as_text().map(str::to_string))
    }

    fn set_bool(&mut self, handle: Handle, value: bool) -> CoreResult<()> {
        self.write(handle, Value::Bool(value))
    }

    fn set_int(&mut self, handle: Handle, value: i64) -> CoreResult<()> {
        self.write(handle, Value::Integer(value))
    }

    fn set_double(&mut self, handle: Handle, value: f64) -> CoreResult<()> {
        self.write(handle, Value::Float(value))
    }

    fn set_string(&mut self, handle: Handle, value: &str) -> CoreResult<()> {
        self.write(handle, Value::Text(value.to_string()))
    }

    fn make_object(&mut self, parent: Handle, key: &str) -> CoreResult<Handle> {
        let path = self.insert(parent, key, Value::object())?;
        Ok(self.mint(path))
    }

    fn make_array(&mut self, parent: Handle, key: &str) -> CoreResult<Handle> {
        let path = self.insert(parent, key, Value::array())?;
        Ok(self.mint(path))
    }

    fn make_bool(&mut self, parent: Handle, key: &str, value: bool) -> CoreResult<()> {
        self.insert(parent, key, Value::Bool(value)).map(drop)
    }

    fn make_int(&mut self, parent: Handle, key: &str, value: i64) -> CoreResult<()> {
        self.insert(parent, key, Value::Integer(value)).map(drop)
    }

    fn make_double(&mut self, parent: Handle, key: &str, value: f64) -> CoreResult<()> {
        self.insert(parent, key, Value::Float(value)).map(drop)
    }

    fn make_string(&mut self, parent: Handle, key: &str, value: &str) -> CoreResult<()> {
        self.insert(parent, key, Value::Text(value.to_string()))
            .map(drop)
    }

    fn remove(&mut self, parent: Handle, key: &str) -> CoreResult<()> {
        self.ensure_active()?;
        if !is_valid_key(key) {
            return Err(CoreError::invalid_key(key));
        }
        let path = self.live_path(parent)?;
        navigator::remove_child(self.document_mut(), &path, key).map(drop)
    }

    fn has(&self, parent: Handle, key: &str) -> CoreResult<bool> {
        let node = self.node_of_kind(parent, ValueKind::Object)?;
        Ok(node.get(key).is_some())
    }

    fn erase_element(&mut self, parent: Handle, index: usize) -> CoreResult<()> {
        let path = self.live_path(parent)?;
        navigator::remove_element(self.document_mut(), &path, index).map(drop)
    }

    fn has_element(&self, parent: Handle, index: usize) -> CoreResult<bool> {
        let node = self.node_of_kind(parent, ValueKind::Array)?;
        Ok(node.as_array().is_some_and(|items| index < items.len()))
    }

    fn child(&mut self, parent: Handle, key: &str) -> CoreResult<Handle> {
        let present = self.has(parent, key)?;
        let path = self.bound_path(parent)?.child(key);
        if !present {
            return Err(CoreError::not_found(path));
        }
        Ok(self.mint(path))
    }

    fn element(&mut self, parent: Handle, index: usize) -> CoreResult<Handle> {
        let present = self.has_element(parent, index)?;
        let path = self.bound_path(parent)?.element(index);
        if !present {
            return Err(CoreError::not_found(path));
        }
        Ok(self.mint(path))
    }

    fn push_object(&mut self, array: Handle) -> CoreResult<Handle> {
        let path = self.append(array, Value::object())?;
        Ok(self.mint(path))
    }

    fn push_array(&mut self, array: Handle) -> CoreResult<Handle> {
        let path = self.append(array, Value::array())?;
        Ok(self.mint(path))
    }

    fn push_bool(&mut self, array: Handle, value: bool) -> CoreResult<()> {
        self.append(array, Value::Bool(value)).map(drop)
    }

    fn push_int(&mut self, array: Handle, value: i64) -> CoreResult<()> {
        self.append(array, Value::Integer(value)).map(drop)
    }

    fn push_double(&mut self, array: Handle, value: f64) -> CoreResult<()> {
        self.append(array, Value::Float(value)).map(drop)
    }

    fn push_string(&mut self, array: Handle, value: &str) -> CoreResult<()> {
        self.append(array, Value::Text(value.to_string())).map(drop)
    }

    fn kind(&self, handle: Handle) -> CoreResult<ValueKind> {
        Ok(self.node(handle)?.kind())
    }

    fn len(&self, handle: Handle) -> CoreResult<usize> {
        let node = self.node(handle)?;
        node.len()
            .ok_or_else(|| self.mismatch(handle, ValueKind::Object, node.kind()))
    }

    fn keys(&self, handle: Handle) -> CoreResult<Vec<String>> {
        let node = self.node_of_kind(handle, ValueKind::Object)?;
        Ok(node
            .as_object()
            .map(|entries| entries.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default())
    }

    fn get_value(&self, handle: Handle) -> CoreResult<Value> {
        self.node(handle).cloned()
    }

    fn path(&self, handle: Handle) -> CoreResult<Path> {
        self.bound_path(handle).cloned()
    }

    fn commit(&mut self) -> CoreResult<Version> {
        self.commit_inner()
    }

    fn rollback(&mut self) {
        self.rollback_inner();
    }
}
