//! Nested subtree specification and its validation walk.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::errors::SpecError;

/// Maximum length of a category name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// A proposed subtree: a root name plus recursively nested children.
///
/// This is the input to [`SubtreeInserter`](crate::SubtreeInserter). The
/// `children` field may be omitted in JSON input and defaults to empty; an
/// explicit empty list describes a leaf. A `children` value that is not a
/// list fails deserialization outright, before validation even runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtreeSpec {
    /// Name for this node; must be globally unique once materialized.
    pub name: String,
    /// Specifications for this node's direct children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SubtreeSpec>,
}

impl SubtreeSpec {
    /// Creates a leaf specification with the given name.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Creates a specification with the given name and children.
    pub fn with_children(name: impl Into<String>, children: Vec<SubtreeSpec>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Validates the whole specification and returns the flattened set of
    /// names it contains.
    ///
    /// For every node at every depth the name must be non-empty, at most
    /// [`MAX_NAME_LEN`] characters, and not already used elsewhere in this
    /// same specification. The walk is pure (no storage access) and
    /// short-circuits on the first violation; validating the same
    /// specification repeatedly yields the same outcome.
    pub fn validate(&self) -> Result<HashSet<String>, SpecError> {
        let mut seen = HashSet::new();
        self.validate_into(&mut seen)?;
        Ok(seen)
    }

    /// Recursive validation step.
    ///
    /// `seen` accumulates every name encountered so far across the whole
    /// walk; it is threaded through explicitly so the walk stays pure and
    /// each level is testable in isolation.
    fn validate_into(&self, seen: &mut HashSet<String>) -> Result<(), SpecError> {
        if self.name.is_empty() {
            return Err(SpecError::MissingName);
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(SpecError::NameTooLong {
                name: self.name.clone(),
                max: MAX_NAME_LEN,
            });
        }
        if !seen.insert(self.name.clone()) {
            return Err(SpecError::DuplicateInBatch {
                name: self.name.clone(),
            });
        }
        for child in &self.children {
            child.validate_into(seen)?;
        }
        Ok(())
    }
}
