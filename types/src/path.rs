//! Validated field addresses and the copy-on-write assignment they drive.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{FieldSpec, field_spec};
use crate::document::{Node, NodeMap};
use crate::step::Section;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("field path must not be empty")]
    Empty,
    #[error("field path `{0}` contains an empty segment")]
    EmptySegment(String),
    #[error("invalid path segment `{0}` (expected [a-z0-9_])")]
    InvalidSegment(String),
    #[error("unknown section `{0}`")]
    UnknownSection(String),
    #[error("field path `{0}` names a section but no field")]
    MissingField(String),
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

/// Address of a value inside a [`crate::WizardDocument`].
///
/// The first segment is always a known [`Section`]. Paths built with
/// [`FieldPath::field`] or parsed with [`FieldPath::parse`] are checked against
/// the field catalog; [`FieldPath::nested`] only checks segment syntax and is meant
/// for sub-records that the catalog does not describe yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    section: Section,
    segments: Vec<String>,
}

fn check_segment(segment: &str) -> Result<(), PathError> {
    let valid = segment
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(PathError::InvalidSegment(segment.to_string()))
    }
}

impl FieldPath {
    /// Catalog field of `section`.
    pub fn field(section: Section, key: &str) -> Result<Self, PathError> {
        if field_spec(section, key).is_none() {
            return Err(PathError::UnknownField(format!("{}.{key}", section.key())));
        }
        Ok(Self {
            section,
            segments: vec![key.to_string()],
        })
    }

    /// Parse a dotted `section.field` address against the catalog.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }
        let mut parts = raw.split('.');
        let head = parts.next().unwrap_or_default();
        let section =
            Section::from_key(head).ok_or_else(|| PathError::UnknownSection(head.to_string()))?;
        let rest: Vec<&str> = parts.collect();
        match rest.as_slice() {
            [] => Err(PathError::MissingField(raw.to_string())),
            [key] => {
                if key.is_empty() {
                    return Err(PathError::EmptySegment(raw.to_string()));
                }
                Self::field(section, key)
            }
            _ => Err(PathError::UnknownField(raw.to_string())),
        }
    }

    /// Arbitrary-depth address inside `section`, validated for syntax only.
    pub fn nested<I, S>(section: Section, segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::MissingField(section.key().to_string()));
        }
        for segment in &segments {
            if segment.is_empty() {
                return Err(PathError::EmptySegment(format!(
                    "{}.{}",
                    section.key(),
                    segments.join(".")
                )));
            }
            check_segment(segment)?;
        }
        Ok(Self { section, segments })
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    /// Final segment.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len() + 1
    }

    /// Catalog entry, when this is a `section.field` path.
    #[must_use]
    pub fn spec(&self) -> Option<&'static FieldSpec> {
        match self.segments.as_slice() {
            [key] => field_spec(self.section, key),
            _ => None,
        }
    }

    pub(crate) fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.depth());
        keys.push(self.section.key());
        keys.extend(self.segments.iter().map(String::as_str));
        keys
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section.key())?;
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Copy-on-write assignment of `value` at `keys` below `root`.
///
/// Every map on the path is copied; maps off the path are shared with `root`
/// (same `Arc`). `None` removes the leaf. A non-map value found where the path
/// needs a map is replaced by an empty map.
pub(crate) fn assign(root: &Arc<NodeMap>, keys: &[&str], value: Option<Node>) -> Arc<NodeMap> {
    let Some((head, rest)) = keys.split_first() else {
        return Arc::clone(root);
    };

    let mut copy: NodeMap = root.as_ref().clone();
    if rest.is_empty() {
        match value {
            Some(node) => {
                copy.insert((*head).to_string(), node);
            }
            None => {
                copy.remove(*head);
            }
        }
    } else {
        let child = match copy.get(*head) {
            Some(Node::Map(map)) => Arc::clone(map),
            _ => Arc::new(NodeMap::new()),
        };
        copy.insert((*head).to_string(), Node::Map(assign(&child, rest, value)));
    }
    Arc::new(copy)
}
