//! Error types for category store operations.
//!
//! This module defines structured error types for storage operations,
//! providing better error context and type safety than string-based errors.

use thiserror::Error;

use crate::category::CategoryId;

/// Errors that can occur while reading or writing the category store.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// Category not found by id.
    #[error("category not found: {id}")]
    CategoryNotFound {
        /// The id that did not resolve to a stored category
        id: CategoryId,
    },

    /// Name already taken by a stored category.
    #[error("category name already exists: {name}")]
    DuplicateName {
        /// The colliding name
        name: String,
    },

    /// The storage-level unique constraint on `name` rejected a write.
    ///
    /// This is the constraint acting as the final arbiter: a concurrent
    /// writer claimed one of the names between the pre-check and the insert.
    /// The surrounding transaction has already been rolled back, so no
    /// partial nodes persist.
    #[error("unique name constraint violated: {reason}")]
    UniqueViolation {
        /// Context message including the underlying driver error
        reason: String,
    },

    /// Underlying sqlx/database failure.
    #[error("storage error: {reason}")]
    Sqlx {
        /// Context message describing the failed operation
        reason: String,
        /// The underlying sqlx error, when one is available
        #[source]
        source: Option<sqlx::Error>,
    },
}

impl StoreError {
    /// Check if this error indicates a category was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::CategoryNotFound { .. })
    }

    /// Check if this error indicates a name collision, whether detected by a
    /// pre-check or by the storage-level constraint.
    pub fn is_duplicate_name(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateName { .. } | StoreError::UniqueViolation { .. }
        )
    }

    /// Check if this error is a backing-store failure (safe to retry, since
    /// all mutations are transactional).
    pub fn is_storage_error(&self) -> bool {
        matches!(self, StoreError::Sqlx { .. })
    }

    /// Get the category id if this error is about a specific category.
    pub fn category_id(&self) -> Option<&CategoryId> {
        match self {
            StoreError::CategoryNotFound { id } => Some(id),
            _ => None,
        }
    }
}

// Conversion from StoreError to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
