//!
//! Taxa: a hierarchical category store.
//!
//! Categories form a forest of uniquely named nodes persisted in a relational
//! backing store (SQLite or PostgreSQL via sqlx).
//!
//! ## Core Concepts
//!
//! * **[`Category`] / [`CategoryId`] (`category`)**: the node model. Every
//!   category has a globally unique name and an optional parent; a category
//!   with no parent is a root.
//! * **[`TreeStore`] (`store`)**: the persistence layer plus the read-side
//!   traversal queries (children, descendants, ancestors, siblings), computed
//!   as recursive closures over the parent edge.
//! * **[`SubtreeSpec`]**: a nested specification of a subtree to create, as a
//!   root name plus recursively nested child specifications.
//! * **[`SubtreeInserter`] (`insert`)**: the validate-then-materialize
//!   protocol that creates an entire subtree in one transaction, or nothing.
//! * **`service`** (feature `service`): a thin axum HTTP layer over the two
//!   inbound operations (node info lookup, subtree creation).

pub mod category;
pub mod insert;
pub mod store;

#[cfg(feature = "service")]
pub mod service;

pub use category::{Category, CategoryId, SubtreeSpec};
pub use insert::SubtreeInserter;
pub use store::TreeStore;

/// Result type used throughout the taxa library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the taxa library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Structural violation in a create-subtree specification.
    #[error(transparent)]
    Spec(category::SpecError),

    /// Structured storage errors from the store module.
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Spec(_) => "category",
            Error::Store(_) => "store",
        }
    }

    /// Check if this error indicates a category was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a structurally invalid specification.
    ///
    /// Invalid specifications are rejected before any storage access; the
    /// caller must correct the input before retrying.
    pub fn is_invalid_spec(&self) -> bool {
        matches!(self, Error::Spec(_))
    }

    /// Check if this error indicates a name collision with stored data,
    /// whether caught by the pre-check or by the storage-level unique
    /// constraint.
    pub fn is_duplicate_name(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_duplicate_name(),
            _ => false,
        }
    }

    /// Check if this error is a backing-store failure.
    ///
    /// Storage failures leave no partial writes behind (every mutation runs
    /// in a transaction), so retrying the whole operation is safe.
    pub fn is_storage_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_storage_error(),
            _ => false,
        }
    }
}
