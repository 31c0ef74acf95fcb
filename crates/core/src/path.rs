//! Object paths
//!
//! An [`ObjectPath`] locates a value inside a document as a sequence of
//! field and list-index segments. Reactors attach paths to events and errors.
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `field` | Struct or map field | `f1` |
//! | `n` | List index | `0` |
//! | `a.b` | Nested segments | `f1.0.g1` |
//! | (empty) | Root | `` |

use crate::error::{ModelError, Result};
use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A segment in an object path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Field of a struct or map
    Field(Identifier),
    /// Position in a list
    Index(u64),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(id) => write!(f, "{}", id),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Location of a value within a document
///
/// # Examples
///
/// ```
/// use tessera_core::{Identifier, ObjectPath};
///
/// let f1 = Identifier::parse("f1").unwrap();
/// let path = ObjectPath::root().index(1).field(f1).index(0);
/// assert_eq!(path.to_string(), "1.f1.0");
/// assert_eq!("1.f1.0".parse::<ObjectPath>().unwrap(), path);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ObjectPath {
    segments: Vec<PathSegment>,
}

impl ObjectPath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        ObjectPath {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        ObjectPath { segments }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if this is the root path
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a field segment (builder pattern)
    pub fn field(mut self, field: Identifier) -> Self {
        self.segments.push(PathSegment::Field(field));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: u64) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Push a segment (mutating)
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Remove and return the last segment
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Get the parent path (None if root)
    pub fn parent(&self) -> Option<ObjectPath> {
        if self.segments.is_empty() {
            None
        } else {
            let mut parent = self.clone();
            parent.segments.pop();
            Some(parent)
        }
    }

    /// Get the last segment (None if root)
    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Check if this path is an ancestor of another (or equal)
    pub fn is_ancestor_of(&self, other: &ObjectPath) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromStr for ObjectPath {
    type Err = ModelError;

    /// Parse a dot-separated path; all-digit segments are list indices
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(ObjectPath::root());
        }
        let mut segments = Vec::new();
        let mut position = 0;
        for text in s.split('.') {
            let invalid = |reason: String| ModelError::InvalidPath {
                input: s.to_string(),
                position,
                reason,
            };
            if text.is_empty() {
                return Err(invalid("empty segment".to_string()));
            }
            if text.bytes().all(|b| b.is_ascii_digit()) {
                let idx = text
                    .parse::<u64>()
                    .map_err(|e| invalid(format!("invalid index {:?}: {}", text, e)))?;
                segments.push(PathSegment::Index(idx));
            } else {
                let id = Identifier::parse(text).map_err(|e| invalid(e.to_string()))?;
                segments.push(PathSegment::Field(id));
            }
            position += text.len() + 1;
        }
        Ok(ObjectPath { segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identifier {
        Identifier::parse(s).unwrap()
    }

    #[test]
    fn test_root_renders_empty() {
        assert_eq!(ObjectPath::root().to_string(), "");
        assert!(ObjectPath::root().parent().is_none());
    }

    #[test]
    fn test_parse_mixed_segments() {
        let path: ObjectPath = "f1.0.field-two".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Field(id("f1")),
                PathSegment::Index(0),
                PathSegment::Field(id("field-two")),
            ]
        );
        assert_eq!(path.to_string(), "f1.0.field-two");
    }

    #[test]
    fn test_parse_errors_report_position() {
        let err = "f1..g".parse::<ObjectPath>().unwrap_err();
        assert!(matches!(err, ModelError::InvalidPath { position: 3, .. }));
        assert!("f1.Bad".parse::<ObjectPath>().is_err());
    }

    #[test]
    fn test_parent_and_ancestry() {
        let path = ObjectPath::root().field(id("f1")).index(2);
        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "f1");
        assert!(parent.is_ancestor_of(&path));
        assert!(!path.is_ancestor_of(&parent));
        assert_eq!(path.last_segment(), Some(&PathSegment::Index(2)));
    }
}
