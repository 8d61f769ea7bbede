//! Write-side operations: category creation and cascading delete.
//!
//! Every mutation runs inside a transaction. These are low-level primitives;
//! the validate-then-materialize protocol that composes them lives in
//! [`crate::insert`].

use sqlx::{Any, Transaction};

use crate::Result;
use crate::category::{Category, CategoryId};
use crate::store::errors::StoreError;

use super::{SqlxResultExt, TreeStore};

/// Insert a single root category inside an open transaction.
pub(crate) async fn insert_root(tx: &mut Transaction<'_, Any>, name: &str) -> Result<Category> {
    let id = CategoryId::generate();

    sqlx::query("INSERT INTO categories (id, name, parent_id) VALUES ($1, $2, NULL)")
        .bind(id.as_str())
        .bind(name)
        .execute(&mut **tx)
        .await
        .sql_context("Failed to insert root category")?;

    Ok(Category {
        id,
        name: name.to_string(),
        parent_id: None,
    })
}

/// Bulk-insert sibling categories under one parent as a single multi-row
/// INSERT inside an open transaction.
///
/// Ids are assigned here; the returned categories are in the same order as
/// `names`. Uniqueness is not re-checked here; the storage constraint still
/// rejects collisions, surfacing as a unique-violation error.
pub(crate) async fn insert_children(
    tx: &mut Transaction<'_, Any>,
    parent_id: &CategoryId,
    names: &[String],
) -> Result<Vec<Category>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let created: Vec<Category> = names
        .iter()
        .map(|name| Category {
            id: CategoryId::generate(),
            name: name.clone(),
            parent_id: Some(parent_id.clone()),
        })
        .collect();

    // One (id, name, parent_id) placeholder triple per row.
    let rows: Vec<String> = (0..created.len())
        .map(|i| format!("(${}, ${}, ${})", 3 * i + 1, 3 * i + 2, 3 * i + 3))
        .collect();
    let sql = format!(
        "INSERT INTO categories (id, name, parent_id) VALUES {}",
        rows.join(", ")
    );

    let mut query = sqlx::query(&sql);
    for category in &created {
        query = query
            .bind(category.id.as_str())
            .bind(category.name.as_str())
            .bind(category.parent_id.as_ref().map(CategoryId::as_str));
    }

    query
        .execute(&mut **tx)
        .await
        .sql_context("Failed to bulk insert categories")?;

    Ok(created)
}

/// Create a single category with no parent.
pub(crate) async fn create_root(store: &TreeStore, name: &str) -> Result<Category> {
    let mut tx = store
        .pool()
        .begin()
        .await
        .sql_context("Failed to begin transaction")?;

    // A lone root insert knows exactly which name collided.
    let created = match insert_root(&mut tx, name).await {
        Err(crate::Error::Store(StoreError::UniqueViolation { .. })) => {
            return Err(StoreError::DuplicateName {
                name: name.to_string(),
            }
            .into());
        }
        other => other?,
    };

    tx.commit()
        .await
        .sql_context("Failed to commit transaction")?;

    Ok(created)
}

/// Create multiple sibling categories under one parent.
pub(crate) async fn create_children(
    store: &TreeStore,
    parent_id: &CategoryId,
    names: &[String],
) -> Result<Vec<Category>> {
    let mut tx = store
        .pool()
        .begin()
        .await
        .sql_context("Failed to begin transaction")?;

    let created = insert_children(&mut tx, parent_id, names).await?;

    tx.commit()
        .await
        .sql_context("Failed to commit transaction")?;

    Ok(created)
}

/// Delete a category; the ON DELETE CASCADE foreign key removes its entire
/// descendant subtree with it.
pub(crate) async fn delete(store: &TreeStore, id: &CategoryId) -> Result<()> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id.as_str())
        .execute(store.pool())
        .await
        .sql_context("Failed to delete category")?;

    if result.rows_affected() == 0 {
        return Err(StoreError::CategoryNotFound { id: id.clone() }.into());
    }

    Ok(())
}
