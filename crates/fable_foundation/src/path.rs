//! Mutation paths and their application to property maps.
//!
//! A path is parsed once into a small AST and applied as data from then on;
//! nothing re-splits strings at mutation time. The grammar is dotted segments
//! with an optional leading operator:
//!
//! ```text
//! stats.hp        set the value at stats.hp
//! +inventory      append the value to the inventory list
//! -tags.seen      remove the first equal value from the tags.seen list
//! ```
//!
//! Application is pure: it takes a property map and returns a new one, and it
//! knows nothing about entities, events, or gating. Failures come back as
//! errors; callers decide what a failure means mid-sequence.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::collections::FbVec;
use crate::error::{Error, Result};
use crate::value::{PropMap, Value};

// =============================================================================
// Path AST
// =============================================================================

/// The operation a mutation path performs at its final segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PathOp {
    /// Replace (or create) the value at the path.
    Set,
    /// Append the value to the list at the path.
    Append,
    /// Remove the first equal value from the list at the path.
    Remove,
}

impl fmt::Display for PathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => Ok(()),
            Self::Append => write!(f, "+"),
            Self::Remove => write!(f, "-"),
        }
    }
}

/// A parsed mutation path: an operation plus the segments to reach its slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MutationPath {
    op: PathOp,
    segments: Vec<Arc<str>>,
}

impl MutationPath {
    /// Parses a path from its text form.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for an empty path, a bare operator, or an empty
    /// segment (leading, trailing, or doubled dots).
    pub fn parse(text: &str) -> Result<Self> {
        let (op, rest) = match text.as_bytes().first() {
            Some(b'+') => (PathOp::Append, &text[1..]),
            Some(b'-') => (PathOp::Remove, &text[1..]),
            Some(_) => (PathOp::Set, text),
            None => return Err(Error::path_syntax(text, "empty path")),
        };
        if rest.is_empty() {
            return Err(Error::path_syntax(text, "operator without a path"));
        }
        let mut segments = Vec::new();
        for segment in rest.split('.') {
            if segment.is_empty() {
                return Err(Error::path_syntax(text, "empty segment"));
            }
            segments.push(Arc::from(segment));
        }
        Ok(Self { op, segments })
    }

    /// Returns the operation.
    #[must_use]
    pub const fn op(&self) -> PathOp {
        self.op
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[Arc<str>] {
        &self.segments
    }
}

impl FromStr for MutationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for MutationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Changes
// =============================================================================

/// An ordered sequence of path mutations.
///
/// Order is meaningful: application walks the entries front to back and stops
/// at the first failure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Changes {
    entries: Vec<(MutationPath, Value)>,
}

impl Changes {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mutation parsed from its text form.
    ///
    /// # Errors
    ///
    /// Returns the path's syntax error, before anything is applied anywhere.
    pub fn with(mut self, path: &str, value: impl Into<Value>) -> Result<Self> {
        let parsed = MutationPath::parse(path)?;
        self.entries.push((parsed, value.into()));
        Ok(self)
    }

    /// Adds a pre-parsed mutation.
    #[must_use]
    pub fn with_path(mut self, path: MutationPath, value: impl Into<Value>) -> Self {
        self.entries.push((path, value.into()));
        self
    }

    /// Returns the number of mutations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no mutations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the mutations in application order.
    pub fn iter(&self) -> impl Iterator<Item = &(MutationPath, Value)> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a (MutationPath, Value);
    type IntoIter = std::slice::Iter<'a, (MutationPath, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// =============================================================================
// Application
// =============================================================================

/// Applies one mutation to a property map, returning the new map.
///
/// Intermediate segments must be maps; missing intermediates are created as
/// empty maps for `Set` and `Append`. `Append` to an absent slot creates a
/// one-element list. `Remove` requires the full path to exist and the list to
/// contain an equal value.
///
/// # Errors
///
/// Returns an error when traversal crosses a non-map value, when a list
/// operation finds no list, or when a removal finds no equal value. The input
/// map is never observed partially changed; an error means "no effect".
pub fn apply_mutation(props: &PropMap, path: &MutationPath, value: &Value) -> Result<PropMap> {
    apply_at(props, path, 0, value)
}

fn apply_at(map: &PropMap, path: &MutationPath, depth: usize, value: &Value) -> Result<PropMap> {
    let segment = &path.segments()[depth];
    let last = depth == path.segments().len() - 1;

    if last {
        return match path.op() {
            PathOp::Set => Ok(map.insert(segment.clone(), value.clone())),
            PathOp::Append => match map.get(segment.as_ref()) {
                None | Some(Value::Null) => Ok(map.insert(
                    segment.clone(),
                    Value::List(FbVec::unit(value.clone())),
                )),
                Some(Value::List(items)) => Ok(map.insert(
                    segment.clone(),
                    Value::List(items.push_back(value.clone())),
                )),
                Some(_) => Err(Error::path_not_a_list(path.to_string())),
            },
            PathOp::Remove => match map.get(segment.as_ref()) {
                Some(Value::List(items)) => items
                    .without_first(value)
                    .map(|rest| map.insert(segment.clone(), Value::List(rest)))
                    .ok_or_else(|| Error::path_value_not_found(path.to_string())),
                _ => Err(Error::path_not_a_list(path.to_string())),
            },
        };
    }

    let child = match map.get(segment.as_ref()) {
        None | Some(Value::Null) => {
            if path.op() == PathOp::Remove {
                // Nothing to descend into; the list cannot exist.
                return Err(Error::path_not_a_list(path.to_string()));
            }
            PropMap::new()
        }
        Some(Value::Map(inner)) => inner.clone(),
        Some(_) => {
            return Err(Error::path_not_a_map(
                path.to_string(),
                segment.to_string(),
            ));
        }
    };

    let updated = apply_at(&child, path, depth + 1, value)?;
    Ok(map.insert(segment.clone(), Value::Map(updated)))
}

/// Reads the value at a dotted path, without mutation semantics.
///
/// Returns `None` when any segment is missing or crosses a non-map value.
#[must_use]
pub fn read_path<'a>(props: &'a PropMap, path: &str) -> Option<&'a Value> {
    let mut current = props;
    let mut segments = path.split('.').peekable();
    loop {
        let segment = segments.next()?;
        if segment.is_empty() {
            return None;
        }
        let value = current.get(segment)?;
        if segments.peek().is_none() {
            return Some(value);
        }
        match value {
            Value::Map(inner) => current = inner,
            _ => return None,
        }
    }
}
