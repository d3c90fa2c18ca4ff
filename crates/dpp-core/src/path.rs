//! # Instance Paths
//!
//! Structural diagnostics are reported against a location in the document,
//! expressed as the sequence of object keys and array indices from the root.
//! The validator hands these out as JSON Pointers (RFC 6901); [`InstancePath`]
//! parses them back into segments so diagnostics can be ordered segment by
//! segment instead of by raw string.
//!
//! ## Ordering
//!
//! Paths compare lexicographically over their segments. At a single depth,
//! array indices compare numerically (`/2` before `/10`) and sort before
//! object keys. A proper prefix sorts before its extensions, so the root
//! location comes first.
//!
//! A pointer segment made only of ASCII digits is read as an index. An object
//! key spelled like a number therefore orders as an index; it still renders
//! identically.

use std::fmt;

/// One step from a parent value to a child value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    /// Array index.
    Index(usize),
    /// Object key, unescaped.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

/// Location of a value inside a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstancePath(Vec<PathSegment>);

impl InstancePath {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a JSON Pointer such as `/materials/0/share_percent`.
    ///
    /// The empty string is the root. `~1` and `~0` escapes are decoded.
    pub fn from_pointer(pointer: &str) -> Self {
        if pointer.is_empty() {
            return Self::root();
        }
        let body = pointer.strip_prefix('/').unwrap_or(pointer);
        let segments = body
            .split('/')
            .map(|raw| {
                let key = raw.replace("~1", "/").replace("~0", "~");
                if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(index) = key.parse::<usize>() {
                        return PathSegment::Index(index);
                    }
                }
                PathSegment::Key(key)
            })
            .collect();
        Self(segments)
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Whether this is the root location.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend the path by one segment.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }
}

impl From<Vec<PathSegment>> for InstancePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

/// Renders `/` followed by the unescaped segments joined by `/`. The root
/// renders as `/`.
impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
