//! Symbolic paths into a document.
//!
//! A path is a sequence of object keys and array indices walked from the
//! root. Paths address nodes by name and position, never by memory address,
//! so they stay meaningful while the tree around them is edited.
//!
//! Textual form: keys are joined with `.`, indices are written in brackets,
//! and the root is the empty string, e.g. `servers[0].port`.

use crate::error::{CodecError, CodecResult};
use std::fmt;
use std::str::FromStr;

/// Characters with meaning in the textual path syntax. Object keys must not
/// contain them.
pub const RESERVED_KEY_CHARS: [char; 3] = ['.', '[', ']'];

/// Returns true if `key` can be used as an object key in a path.
///
/// A key must be non-empty and must not contain any of
/// [`RESERVED_KEY_CHARS`].
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(RESERVED_KEY_CHARS)
}

/// A single step in a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key.
    Key(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// A location in a document, relative to the root.
///
/// # Example
///
/// ```
/// use docstore_codec::Path;
///
/// let port = Path::root().key("servers").index(0).key("port");
/// assert_eq!(port.to_string(), "servers[0].port");
/// assert_eq!("servers[0].port".parse::<Path>().unwrap(), port);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The empty path, addressing the root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from segments.
    #[must_use]
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Appends a key segment (builder style).
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Appends an index segment (builder style).
    #[must_use]
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Returns a new path with `key` appended.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        self.clone().key(key)
    }

    /// Returns a new path with `idx` appended.
    #[must_use]
    pub fn element(&self, idx: usize) -> Self {
        self.clone().index(idx)
    }

    /// The parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.segments.split_last()?;
        Some(Path::from_segments(init.to_vec()))
    }

    /// The last segment, or `None` for the root.
    #[must_use]
    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// True if `self` is a prefix of `other` (a path is its own ancestor).
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        let mut segments = Vec::new();
        let mut rest = s;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                let close = after.find(']').ok_or_else(|| {
                    CodecError::invalid_path(s, "unclosed bracket")
                })?;
                let digits = &after[..close];
                let idx = digits
                    .parse::<usize>()
                    .map_err(|_| CodecError::invalid_path(s, format!("bad index '{digits}'")))?;
                segments.push(PathSegment::Index(idx));
                rest = &after[close + 1..];
            } else {
                if !segments.is_empty() {
                    rest = rest
                        .strip_prefix('.')
                        .ok_or_else(|| CodecError::invalid_path(s, "expected '.' or '['"))?;
                }
                let end = rest.find(RESERVED_KEY_CHARS).unwrap_or(rest.len());
                let key = &rest[..end];
                if key.is_empty() {
                    return Err(CodecError::invalid_path(s, "empty key"));
                }
                segments.push(PathSegment::Key(key.to_string()));
                rest = &rest[end..];
            }
        }

        Ok(Path { segments })
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self::from_segments(segments)
    }
}
