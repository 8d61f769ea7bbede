//!
//! Defines the category node model and related types.
//!
//! A `Category` is a single named node in the tree. This module also defines
//! the `CategoryId` identifier type, the nested `SubtreeSpec` input used for
//! bulk subtree creation, and the validation errors that input can produce.

pub mod errors;
mod id;
mod spec;

pub use errors::SpecError;
pub use id::CategoryId;
pub use spec::{MAX_NAME_LEN, SubtreeSpec};

use serde::{Deserialize, Serialize};

/// A single category: a named node with an optional parent.
///
/// Names are unique across the whole store, not just among siblings, and are
/// case-sensitive. A category with `parent_id = None` is a root. Both fields
/// are immutable once created; the only mutation in a category's lifecycle is
/// a cascading delete, which removes the node together with every descendant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Store-assigned identifier.
    pub id: CategoryId,
    /// Globally unique display name, 1..=255 characters.
    pub name: String,
    /// Parent edge; `None` marks a root.
    pub parent_id: Option<CategoryId>,
}

impl Category {
    /// Returns true if this category has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
