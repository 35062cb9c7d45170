//! Path resolution and structural edits on a document tree.
//!
//! Every function here walks from the root along a [`Path`] on each call.
//! Nothing holds a reference into the tree between calls, so edits that
//! move sibling storage around never leave a dangling address behind.
//!
//! Failures name the node where the walk stopped: [`CoreError::NotFound`]
//! carries the path of the missing node, [`CoreError::TypeMismatch`] the
//! path of the container that had the wrong kind for the next segment.

use crate::error::{CoreError, CoreResult};
use docstore_codec::{Path, PathSegment, Value, ValueKind};

/// Why a single step of a walk failed.
enum Miss {
    Absent,
    WrongKind { expected: ValueKind, actual: ValueKind },
}

impl Miss {
    fn into_error(self, path: &Path, depth: usize) -> CoreError {
        let segments = path.segments();
        match self {
            Miss::Absent => CoreError::not_found(Path::from_segments(segments[..=depth].to_vec())),
            Miss::WrongKind { expected, actual } => CoreError::type_mismatch(
                Path::from_segments(segments[..depth].to_vec()),
                expected,
                actual,
            ),
        }
    }
}

fn expected_for(segment: &PathSegment) -> ValueKind {
    match segment {
        PathSegment::Key(_) => ValueKind::Object,
        PathSegment::Index(_) => ValueKind::Array,
    }
}

fn step<'a>(node: &'a Value, segment: &PathSegment) -> Result<&'a Value, Miss> {
    match (segment, node) {
        (PathSegment::Key(key), Value::Object(_)) => node.get(key).ok_or(Miss::Absent),
        (PathSegment::Index(idx), Value::Array(items)) => items.get(*idx).ok_or(Miss::Absent),
        (segment, other) => Err(Miss::WrongKind {
            expected: expected_for(segment),
            actual: other.kind(),
        }),
    }
}

fn step_mut<'a>(node: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value, Miss> {
    let actual = node.kind();
    match (segment, node) {
        (PathSegment::Key(key), Value::Object(entries)) => entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Miss::Absent),
        (PathSegment::Index(idx), Value::Array(items)) => items.get_mut(*idx).ok_or(Miss::Absent),
        (segment, _) => Err(Miss::WrongKind {
            expected: expected_for(segment),
            actual,
        }),
    }
}

/// Resolves `path` from `root`.
///
/// # Errors
///
/// [`CoreError::NotFound`] if a segment names a missing key or index,
/// [`CoreError::TypeMismatch`] if a segment meets a node of the wrong kind.
pub fn resolve<'a>(root: &'a Value, path: &Path) -> CoreResult<&'a Value> {
    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = step(node, segment).map_err(|miss| miss.into_error(path, depth))?;
    }
    Ok(node)
}

/// Resolves `path` from `root`, mutably.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_mut<'a>(root: &'a mut Value, path: &Path) -> CoreResult<&'a mut Value> {
    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        node = step_mut(node, segment).map_err(|miss| miss.into_error(path, depth))?;
    }
    Ok(node)
}

fn object_at<'a>(root: &'a mut Value, path: &Path) -> CoreResult<&'a mut Vec<(String, Value)>> {
    let node = resolve_mut(root, path)?;
    let actual = node.kind();
    node.as_object_mut()
        .ok_or_else(|| CoreError::type_mismatch(path.clone(), ValueKind::Object, actual))
}

fn array_at<'a>(root: &'a mut Value, path: &Path) -> CoreResult<&'a mut Vec<Value>> {
    let node = resolve_mut(root, path)?;
    let actual = node.kind();
    node.as_array_mut()
        .ok_or_else(|| CoreError::type_mismatch(path.clone(), ValueKind::Array, actual))
}

/// Adds `key` to the object at `parent`, returning the new child's path.
///
/// # Errors
///
/// Resolution errors for `parent`, [`CoreError::TypeMismatch`] if it is not
/// an object, [`CoreError::KeyExists`] if `key` is already present. The tree
/// is unchanged on error.
pub fn insert_child(root: &mut Value, parent: &Path, key: &str, value: Value) -> CoreResult<Path> {
    let entries = object_at(root, parent)?;
    if entries.iter().any(|(k, _)| k == key) {
        return Err(CoreError::key_exists(parent.child(key)));
    }
    entries.push((key.to_string(), value));
    Ok(parent.child(key))
}

/// Appends `value` to the array at `parent`, returning the new element's path.
///
/// # Errors
///
/// Resolution errors for `parent`, [`CoreError::TypeMismatch`] if it is not
/// an array.
pub fn push_element(root: &mut Value, parent: &Path, value: Value) -> CoreResult<Path> {
    let items = array_at(root, parent)?;
    items.push(value);
    Ok(parent.element(items.len() - 1))
}

/// Removes `key` from the object at `parent`, returning the removed subtree.
///
/// Remaining entries keep their relative order.
///
/// # Errors
///
/// Resolution errors for `parent`, [`CoreError::TypeMismatch`] if it is not
/// an object, [`CoreError::NotFound`] if `key` is absent.
pub fn remove_child(root: &mut Value, parent: &Path, key: &str) -> CoreResult<Value> {
    let entries = object_at(root, parent)?;
    let pos = entries
        .iter()
        .position(|(k, _)| k == key)
        .ok_or_else(|| CoreError::not_found(parent.child(key)))?;
    Ok(entries.remove(pos).1)
}

/// Removes element `index` from the array at `parent`, returning it.
///
/// Later elements shift down by one.
///
/// # Errors
///
/// Resolution errors for `parent`, [`CoreError::TypeMismatch`] if it is not
/// an array, [`CoreError::NotFound`] if `index` is out of range.
pub fn remove_element(root: &mut Value, parent: &Path, index: usize) -> CoreResult<Value> {
    let items = array_at(root, parent)?;
    if index >= items.len() {
        return Err(CoreError::not_found(parent.element(index)));
    }
    Ok(items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use docstore_codec::parse;

    fn doc() -> Value {
        parse(r#"{"server":{"port":8080,"hosts":["a","b","c"]},"debug":true}"#).unwrap()
    }

    fn p(text: &str) -> Path {
        text.parse().unwrap()
    }

    #[test]
    fn resolve_root_and_nested() {
        let doc = doc();
        assert_eq!(resolve(&doc, &Path::root()).unwrap(), &doc);
        assert_eq!(resolve(&doc, &p("server.port")).unwrap(), &Value::Integer(8080));
        assert_eq!(resolve(&doc, &p("server.hosts[1]")).unwrap(), &Value::from("b"));
    }

    #[test]
    fn resolve_missing_names_the_missing_node() {
        let doc = doc();
        let err = resolve(&doc, &p("server.missing.deeper")).unwrap_err();
        assert!(matches!(&err, CoreError::NotFound { path } if *path == p("server.missing")));

        let err = resolve(&doc, &p("server.hosts[9]")).unwrap_err();
        assert!(matches!(&err, CoreError::NotFound { path } if *path == p("server.hosts[9]")));
    }

    #[test]
    fn resolve_wrong_container_is_type_mismatch() {
        let doc = doc();
        let err = resolve(&doc, &p("server[0]")).unwrap_err();
        assert!(matches!(
            &err,
            CoreError::TypeMismatch { path, expected: ValueKind::Array, actual: ValueKind::Object }
                if *path == p("server")
        ));

        let err = resolve(&doc, &p("debug.x")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn resolve_mut_edits_in_place() {
        let mut doc = doc();
        *resolve_mut(&mut doc, &p("server.port")).unwrap() = Value::Integer(9090);
        assert_eq!(resolve(&doc, &p("server.port")).unwrap(), &Value::Integer(9090));
    }

    #[test]
    fn insert_child_appends_in_order() {
        let mut doc = doc();
        let path = insert_child(&mut doc, &p("server"), "tls", Value::Bool(false)).unwrap();
        assert_eq!(path, p("server.tls"));

        let keys: Vec<_> = resolve(&doc, &p("server"))
            .unwrap()
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(keys, vec!["port", "hosts", "tls"]);
    }

    #[test]
    fn insert_child_rejects_existing_key() {
        let mut doc = doc();
        let before = doc.clone();
        let err = insert_child(&mut doc, &p("server"), "port", Value::Integer(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyExists);
        assert_eq!(doc, before);
    }

    #[test]
    fn insert_child_into_array_is_type_mismatch() {
        let mut doc = doc();
        let err = insert_child(&mut doc, &p("server.hosts"), "x", Value::Integer(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn push_element_returns_index_path() {
        let mut doc = doc();
        let path = push_element(&mut doc, &p("server.hosts"), Value::from("d")).unwrap();
        assert_eq!(path, p("server.hosts[3]"));
        assert_eq!(resolve(&doc, &path).unwrap(), &Value::from("d"));
    }

    #[test]
    fn remove_child_keeps_unrelated_paths() {
        let mut doc = doc();
        let removed = remove_child(&mut doc, &Path::root(), "debug").unwrap();
        assert_eq!(removed, Value::Bool(true));
        assert_eq!(resolve(&doc, &p("server.port")).unwrap(), &Value::Integer(8080));

        let err = remove_child(&mut doc, &Path::root(), "debug").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn remove_element_shifts_later_indices() {
        let mut doc = doc();
        remove_element(&mut doc, &p("server.hosts"), 0).unwrap();
        assert_eq!(resolve(&doc, &p("server.hosts[0]")).unwrap(), &Value::from("b"));
        assert_eq!(resolve(&doc, &p("server.hosts[1]")).unwrap(), &Value::from("c"));
        assert_eq!(
            resolve(&doc, &p("server.hosts[2]")).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        let err = remove_element(&mut doc, &p("server.hosts"), 5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
