//! Read-side traversal queries for the category tree.
//!
//! Ancestor and descendant walks are recursive closure computations over the
//! parent edge, expressed as `WITH RECURSIVE` CTEs so a tree of any depth is
//! collected in a single round trip to the backing store, instead of one
//! query per level.

use crate::Result;
use crate::category::{Category, CategoryId};
use crate::store::errors::StoreError;

use super::{SqlxResultExt, TreeStore};

/// Row shape shared by every category query: (id, name, parent_id).
type CategoryRow = (String, String, Option<String>);

fn from_row((id, name, parent_id): CategoryRow) -> Category {
    Category {
        id: CategoryId::from(id),
        name,
        parent_id: parent_id.map(CategoryId::from),
    }
}

/// Get a category by id.
pub async fn get(store: &TreeStore, id: &CategoryId) -> Result<Category> {
    let row: Option<CategoryRow> =
        sqlx::query_as("SELECT id, name, parent_id FROM categories WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(store.pool())
            .await
            .sql_context("Failed to get category")?;

    match row {
        Some(row) => Ok(from_row(row)),
        None => Err(StoreError::CategoryNotFound { id: id.clone() }.into()),
    }
}

/// Get the direct children of a category.
pub async fn get_children(store: &TreeStore, id: &CategoryId) -> Result<Vec<Category>> {
    let rows: Vec<CategoryRow> = sqlx::query_as(
        "SELECT id, name, parent_id FROM categories WHERE parent_id = $1 ORDER BY name",
    )
    .bind(id.as_str())
    .fetch_all(store.pool())
    .await
    .sql_context("Failed to get children")?;

    Ok(rows.into_iter().map(from_row).collect())
}

/// Get every transitive descendant of a category, excluding the category
/// itself.
///
/// The CTE seeds the closure with the target at depth 0 and repeatedly joins
/// the child edge; tracking the depth lets the final SELECT drop the seed row
/// without re-binding the target id.
pub async fn get_descendants(store: &TreeStore, id: &CategoryId) -> Result<Vec<Category>> {
    let rows: Vec<CategoryRow> = sqlx::query_as(
        "WITH RECURSIVE descendants AS (
            SELECT id, name, parent_id, 0 AS depth
            FROM categories WHERE id = $1

            UNION

            SELECT c.id, c.name, c.parent_id, d.depth + 1
            FROM categories c
            JOIN descendants d ON c.parent_id = d.id
        )
        SELECT id, name, parent_id FROM descendants WHERE depth > 0",
    )
    .bind(id.as_str())
    .fetch_all(store.pool())
    .await
    .sql_context("Failed to get descendants")?;

    Ok(rows.into_iter().map(from_row).collect())
}

/// Get every transitive ancestor of a category, excluding the category
/// itself. Empty for roots.
///
/// Symmetric to [`get_descendants`], walking the parent edge upward instead
/// of the child edge outward.
pub async fn get_ancestors(store: &TreeStore, id: &CategoryId) -> Result<Vec<Category>> {
    let rows: Vec<CategoryRow> = sqlx::query_as(
        "WITH RECURSIVE ancestors AS (
            SELECT id, name, parent_id, 0 AS depth
            FROM categories WHERE id = $1

            UNION

            SELECT c.id, c.name, c.parent_id, a.depth + 1
            FROM categories c
            JOIN ancestors a ON c.id = a.parent_id
        )
        SELECT id, name, parent_id FROM ancestors WHERE depth > 0",
    )
    .bind(id.as_str())
    .fetch_all(store.pool())
    .await
    .sql_context("Failed to get ancestors")?;

    Ok(rows.into_iter().map(from_row).collect())
}

/// Get the categories sharing the target's parent, excluding the target
/// itself.
///
/// Roots have a NULL parent edge, which never satisfies the join, so a root
/// has no siblings even when other roots exist.
pub async fn get_siblings(store: &TreeStore, id: &CategoryId) -> Result<Vec<Category>> {
    let rows: Vec<CategoryRow> = sqlx::query_as(
        "SELECT s.id, s.name, s.parent_id
         FROM categories s
         JOIN categories c ON s.parent_id = c.parent_id AND s.id <> c.id
         WHERE c.id = $1
         ORDER BY s.name",
    )
    .bind(id.as_str())
    .fetch_all(store.pool())
    .await
    .sql_context("Failed to get siblings")?;

    Ok(rows.into_iter().map(from_row).collect())
}

/// Which of the given names are already taken by stored categories.
pub async fn existing_names(store: &TreeStore, names: &[String]) -> Result<Vec<String>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    // Build the placeholder list dynamically; $n placeholders work for both
    // SQLite and PostgreSQL through the Any driver.
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("${i}")).collect();
    let sql = format!(
        "SELECT name FROM categories WHERE name IN ({}) ORDER BY name",
        placeholders.join(", ")
    );

    let mut query = sqlx::query_as::<_, (String,)>(&sql);
    for name in names {
        query = query.bind(name);
    }

    let rows = query
        .fetch_all(store.pool())
        .await
        .sql_context("Failed to check existing names")?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Total number of stored categories.
pub async fn count(store: &TreeStore) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(store.pool())
        .await
        .sql_context("Failed to count categories")?;

    Ok(row.0)
}
