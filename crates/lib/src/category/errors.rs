//! Validation error types for subtree specifications.
//!
//! Every variant here is detected by the pure validation walk, before any
//! storage access, so a failed validation never requires cleanup.

use thiserror::Error;

/// Errors raised while validating a create-subtree specification.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SpecError {
    /// A node in the specification has no name.
    #[error("specification node is missing a name")]
    MissingName,

    /// A node's name exceeds the maximum length.
    #[error("name longer than {max} characters")]
    NameTooLong {
        /// The offending name
        name: String,
        /// The maximum allowed length, in characters
        max: usize,
    },

    /// The same name appears more than once in the submitted batch.
    ///
    /// Names are globally unique, so a duplicate anywhere in one submitted
    /// specification can never materialize, even when the copies sit under
    /// different parents.
    #[error("duplicate name within submitted subtree: {name}")]
    DuplicateInBatch {
        /// The name that appeared twice
        name: String,
    },
}

impl SpecError {
    /// Get the offending name if this error is about a specific name.
    pub fn name(&self) -> Option<&str> {
        match self {
            SpecError::NameTooLong { name, .. } | SpecError::DuplicateInBatch { name } => {
                Some(name)
            }
            SpecError::MissingName => None,
        }
    }
}

// Conversion from SpecError to the main Error type
impl From<SpecError> for crate::Error {
    fn from(err: SpecError) -> Self {
        crate::Error::Spec(err)
    }
}
