//! SQL schema definitions and migrations.
//!
//! The schema is designed to be portable between SQLite and PostgreSQL.
//!
//! # Migration System
//!
//! Migrations are code-based rather than SQL files so each step can branch on
//! dialect where SQLite and PostgreSQL disagree.
//!
//! ## Adding a New Migration
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a new `migrate_vN_to_vM` async function
//! 3. Add the migration to the match statement in `run_migration`

use crate::Result;
use crate::store::errors::StoreError;

use super::{SqlxResultExt, TreeStore};

/// Current schema version.
///
/// Increment this when making schema changes that require migration.
pub const SCHEMA_VERSION: i64 = 1;

/// SQL statements to create the schema tables.
///
/// Each statement uses portable SQL that works on both SQLite and PostgreSQL.
pub const CREATE_TABLES: &[&str] = &[
    // Schema version tracking
    // BIGINT (64-bit) used for portability between SQLite and PostgreSQL
    "CREATE TABLE IF NOT EXISTS schema_version (
        version BIGINT PRIMARY KEY
    )",
    // One row per category. The UNIQUE constraint on name is the
    // authoritative guard against concurrent inserts claiming the same name,
    // and the self-referencing foreign key gives the parent edge ownership
    // semantics: deleting a category deletes its whole subtree.
    "CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE,
        parent_id TEXT REFERENCES categories(id) ON DELETE CASCADE
    )",
];

/// SQL statements to create indexes.
pub const CREATE_INDEXES: &[&str] = &[
    // Child and sibling lookups, and the recursive traversals, all join on
    // the parent edge.
    "CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories(parent_id)",
];

/// Initialize the database schema.
///
/// Creates tables and indexes if they don't exist, and runs migrations if
/// the stored schema version is behind.
pub async fn initialize(store: &TreeStore) -> Result<()> {
    let pool = store.pool();

    for statement in CREATE_TABLES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .sql_context("Schema creation failed")?;
    }

    let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM schema_version")
        .fetch_optional(pool)
        .await
        .sql_context("Failed to check schema version")?;

    match row {
        None => {
            // First initialization
            sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
                .bind(SCHEMA_VERSION)
                .execute(pool)
                .await
                .sql_context("Failed to initialize schema version")?;
        }
        Some((current_version,)) if current_version < SCHEMA_VERSION => {
            migrate(store, current_version, SCHEMA_VERSION).await?;
        }
        Some(_) => {}
    }

    for statement in CREATE_INDEXES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .sql_context("Index creation failed")?;
    }

    Ok(())
}

/// Run migrations sequentially from one schema version to another.
///
/// Migrations run one step at a time, persisting the version after each, so
/// a failure leaves the database at a well-defined version.
async fn migrate(store: &TreeStore, from: i64, to: i64) -> Result<()> {
    tracing::info!(from, to, "Starting schema migration");

    let mut current = from;
    while current < to {
        let next = current + 1;
        tracing::info!(from = current, to = next, "Running migration");

        run_migration(store, current, next).await?;

        sqlx::query("UPDATE schema_version SET version = $1")
            .bind(next)
            .execute(store.pool())
            .await
            .sql_context("Failed to update schema version")?;

        current = next;
    }

    tracing::info!(from, to, "All migrations completed");
    Ok(())
}

/// Execute a single migration step.
///
/// Add new migrations here as match arms when incrementing `SCHEMA_VERSION`:
///
/// ```ignore
/// match from {
///     1 => migrate_v1_to_v2(store).await,
///     _ => { /* error handling */ }
/// }
/// ```
async fn run_migration(store: &TreeStore, from: i64, to: i64) -> Result<()> {
    // No migrations exist yet; any attempt to migrate means SCHEMA_VERSION
    // was incremented without adding one.
    let _ = store;

    Err(StoreError::Sqlx {
        reason: format!("Unknown migration path: v{from} to v{to}"),
        source: None,
    }
    .into())
}
