//! Dynamic document value type.

use std::fmt;

/// The kind of a [`Value`], without its payload.
///
/// Used in type-mismatch errors and by callers that want to branch on a
/// node's shape before reading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Boolean scalar.
    Bool,
    /// 64-bit signed integer scalar.
    Integer,
    /// 64-bit float scalar.
    Float,
    /// UTF-8 string scalar.
    String,
    /// Ordered array of values.
    Array,
    /// Ordered mapping from string key to value.
    Object,
}

impl ValueKind {
    /// Returns the lowercase name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    /// Returns true for arrays and objects.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of a hierarchical document.
///
/// Objects keep their entries in insertion order. Keys are unique within an
/// object. Order is preserved for iteration and serialization, but two
/// objects with the same entries in a different order compare equal.
#[derive(Debug, Clone)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed integer (full i64 range).
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Text string (UTF-8).
    Text(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Object entries in insertion order.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Creates an empty object.
    #[must_use]
    pub fn object() -> Self {
        Value::Object(Vec::new())
    }

    /// Creates an empty array.
    #[must_use]
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Creates an object from `(key, value)` pairs.
    ///
    /// Later duplicates replace earlier ones in place, so the first
    /// occurrence fixes the key's position.
    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut object = Value::object();
        for (key, value) in entries {
            object.upsert(key.into(), value.into());
        }
        object
    }

    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Get this value as a boolean, if it is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float, if it is one.
    ///
    /// Integers are not widened.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string, if it is a text string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as a mutable array, if it is one.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value's object entries, if it is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get this value's object entries mutably, if it is an object.
    pub fn as_object_mut(&mut self) -> Option<&mut Vec<(String, Value)>> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a key in this object value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Look up a key in this object value, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.as_object_mut()?
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts or replaces `key` in this object.
    ///
    /// Returns the previous value. Does nothing and returns `None` when
    /// `self` is not an object.
    pub fn upsert(&mut self, key: String, value: Value) -> Option<Value> {
        let entries = self.as_object_mut()?;
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    /// Number of elements (array) or entries (object).
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.len()),
            Value::Object(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Returns true for an empty array or object.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Maximum nesting depth. Scalars have depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, above)) = pending.pop() {
            let level = above + 1;
            match node {
                Value::Array(items) => {
                    deepest = deepest.max(level);
                    pending.extend(items.iter().map(|item| (item, level)));
                }
                Value::Object(entries) => {
                    deepest = deepest.max(level);
                    pending.extend(entries.iter().map(|(_, v)| (v, level)));
                }
                _ => {}
            }
        }
        deepest
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            // Bitwise so that a NaN node still equals its own copy.
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            // Keys are unique, so equal length plus containment is equality.
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len() && a.iter().all(|(key, value)| other.get(key) == Some(value))
            }
            _ => false,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::object()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}
