//! Atomic subtree creation.
//!
//! [`SubtreeInserter`] implements the validate-then-materialize protocol: an
//! entire proposed subtree is checked for structural validity and name
//! availability before any write, then created inside a single transaction.
//! Either every node in the specification is persisted, or none is.

use crate::category::{Category, CategoryId, SubtreeSpec};
use crate::store::errors::StoreError;
use crate::store::{SqlxResultExt, TreeStore, write};
use crate::{Error, Result};


/// Creates whole subtrees atomically against a [`TreeStore`].
pub struct SubtreeInserter<'a> {
    store: &'a TreeStore,
}

impl<'a> SubtreeInserter<'a> {
    /// Creates an inserter over the given store.
    pub fn new(store: &'a TreeStore) -> Self {
        Self { store }
    }

    /// Materializes `spec` as a new subtree, returning the created root.
    ///
    /// The protocol:
    ///
    /// 1. Validate the specification (pure, no storage access). Any
    ///    structural violation (missing/empty name, over-length name,
    ///    duplicate name within the batch) rejects the whole call.
    /// 2. Check the flattened name set against storage and abort with a
    ///    duplicate-name error if any name is already taken. This is an
    ///    early exit, not the correctness guarantee.
    /// 3. Create all nodes inside one transaction: the root first, then one
    ///    bulk insert per parent, committing only once the whole subtree is
    ///    in place. The storage unique constraint on `name` remains the
    ///    final arbiter: a concurrent writer claiming one of the names
    ///    between step 2 and commit aborts the transaction, and no nodes
    ///    are persisted.
    pub async fn insert(&self, spec: &SubtreeSpec) -> Result<Category> {
        let mut names: Vec<String> = spec.validate()?.into_iter().collect();
        names.sort_unstable();

        let taken = self.store.existing_names(&names).await?;
        if let Some(name) = taken.into_iter().next() {
            return Err(StoreError::DuplicateName { name }.into());
        }

        tracing::debug!(nodes = names.len(), root = %spec.name, "creating subtree");

        match self.materialize(spec).await {
            Err(Error::Store(StoreError::UniqueViolation { reason })) => {
                // Lost a race after the pre-check; the transaction has
                // rolled back. Recover the colliding name when we can still
                // see it.
                let taken = self.store.existing_names(&names).await.unwrap_or_default();
                match taken.into_iter().next() {
                    Some(name) => Err(StoreError::DuplicateName { name }.into()),
                    None => Err(StoreError::UniqueViolation { reason }.into()),
                }
            }
            other => other,
        }
    }

    /// Creates every node of `spec` inside one transaction.
    ///
    /// An explicit work stack of (parent id, child specifications) pairs
    /// drives the recursion: each step bulk-inserts one parent's direct
    /// children in a single statement, then queues those children with their
    /// own nested specifications.
    async fn materialize(&self, spec: &SubtreeSpec) -> Result<Category> {
        let mut tx = self
            .store
            .pool()
            .begin()
            .await
            .sql_context("Failed to begin transaction")?;

        let root = write::insert_root(&mut tx, &spec.name).await?;

        let mut stack: Vec<(CategoryId, &[SubtreeSpec])> =
            vec![(root.id.clone(), spec.children.as_slice())];
        while let Some((parent_id, children)) = stack.pop() {
            if children.is_empty() {
                continue;
            }

            let names: Vec<String> = children.iter().map(|c| c.name.clone()).collect();
            let created = write::insert_children(&mut tx, &parent_id, &names).await?;

            for (child, child_spec) in created.into_iter().zip(children) {
                stack.push((child.id, child_spec.children.as_slice()));
            }
        }

        tx.commit()
            .await
            .sql_context("Failed to commit transaction")?;

        tracing::debug!(root = %root.id, "subtree created");
        Ok(root)
    }
}
