//! SQL-backed category store.
//!
//! This module provides [`TreeStore`], the persistence layer for categories.
//! It targets both SQLite and PostgreSQL through sqlx's `AnyPool`.
//!
//! ## Architecture
//!
//! - Read-side traversal queries live in [`queries`] and are expressed as
//!   recursive CTEs, so an ancestor or descendant walk of any depth is one
//!   round trip to the backing store.
//! - Write primitives live in [`write`]; every mutation runs inside a
//!   transaction, and the `UNIQUE` constraint on `name` is the authoritative
//!   guard against concurrent inserts claiming the same name.
//!
//! ## Schema and Migrations
//!
//! The schema is defined in the [`schema`] module and initialized when
//! connecting. Migrations are code-based functions rather than SQL files to
//! accommodate dialect differences between SQLite and PostgreSQL.

pub mod errors;
mod queries;
/// Schema definition and migration system.
pub mod schema;
pub(crate) mod write;

use sqlx::AnyPool;
use sqlx::Executor;
use sqlx::any::AnyPoolOptions;

use crate::Result;
use crate::category::{Category, CategoryId};
pub use errors::StoreError;

/// Extension trait for sqlx Result types to simplify error handling.
///
/// Similar to `anyhow::Context`, this adds a method that converts sqlx errors
/// to [`StoreError`] with a context message. Unique-constraint violations are
/// recognized here so every write path reports them uniformly.
pub(crate) trait SqlxResultExt<T> {
    /// Convert an sqlx error to a StoreError with a context message.
    fn sql_context(self, context: &str) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn sql_context(self, context: &str) -> Result<T> {
        self.map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                StoreError::UniqueViolation {
                    reason: format!("{context}: {e}"),
                }
                .into()
            } else {
                StoreError::Sqlx {
                    reason: format!("{context}: {e}"),
                    source: Some(e),
                }
                .into()
            }
        })
    }
}

/// Database backend kind for SQL dialect selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    /// SQLite database
    Sqlite,
    /// PostgreSQL database
    Postgres,
}

/// SQL-backed store for the category tree.
///
/// Supports both SQLite and PostgreSQL through sqlx's `AnyPool`. The store
/// owns the connection pool; clones of the pool are cheap, so `TreeStore` is
/// typically shared behind an `Arc` by services.
///
/// # Thread Safety
///
/// `TreeStore` is `Send + Sync`; the underlying sqlx pool handles connection
/// pooling and thread safety.
pub struct TreeStore {
    pool: AnyPool,
    kind: DbKind,
}

impl TreeStore {
    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Get the database kind.
    pub fn kind(&self) -> DbKind {
        self.kind
    }

    /// Check if this store is using SQLite.
    pub fn is_sqlite(&self) -> bool {
        self.kind == DbKind::Sqlite
    }

    /// Check if this store is using PostgreSQL.
    pub fn is_postgres(&self) -> bool {
        self.kind == DbKind::Postgres
    }

    //
    // READ OPERATIONS
    //

    /// Point lookup of a category by id.
    pub async fn get(&self, id: &CategoryId) -> Result<Category> {
        queries::get(self, id).await
    }

    /// Direct children of the given category (empty if none).
    pub async fn get_children(&self, id: &CategoryId) -> Result<Vec<Category>> {
        queries::get_children(self, id).await
    }

    /// All categories reachable by following child edges transitively from
    /// the target, excluding the target itself.
    pub async fn get_descendants(&self, id: &CategoryId) -> Result<Vec<Category>> {
        queries::get_descendants(self, id).await
    }

    /// All categories reachable by following parent edges transitively from
    /// the target, excluding the target itself. Empty for roots.
    pub async fn get_ancestors(&self, id: &CategoryId) -> Result<Vec<Category>> {
        queries::get_ancestors(self, id).await
    }

    /// Categories sharing the target's parent, excluding the target itself.
    /// Empty for roots.
    pub async fn get_siblings(&self, id: &CategoryId) -> Result<Vec<Category>> {
        queries::get_siblings(self, id).await
    }

    /// Which of the given names are already taken by stored categories.
    pub async fn existing_names(&self, names: &[String]) -> Result<Vec<String>> {
        queries::existing_names(self, names).await
    }

    /// True if any of the given names is already taken.
    pub async fn exists_by_names(&self, names: &[String]) -> Result<bool> {
        Ok(!queries::existing_names(self, names).await?.is_empty())
    }

    /// Total number of stored categories.
    pub async fn count(&self) -> Result<i64> {
        queries::count(self).await
    }

    //
    // WRITE OPERATIONS
    //

    /// Insert a single category with no parent.
    ///
    /// Fails with a duplicate-name error if the name is already taken.
    pub async fn create_root(&self, name: &str) -> Result<Category> {
        write::create_root(self, name).await
    }

    /// Bulk-insert sibling categories under one parent in a single storage
    /// round trip, returning them with assigned ids.
    ///
    /// This is a low-level write primitive: it does not pre-check name
    /// uniqueness (that is the subtree-insert protocol's job), though the
    /// storage constraint still rejects collisions.
    pub async fn create_children(
        &self,
        parent_id: &CategoryId,
        names: &[String],
    ) -> Result<Vec<Category>> {
        write::create_children(self, parent_id, names).await
    }

    /// Delete a category and, via the cascading foreign key, its entire
    /// descendant subtree.
    pub async fn delete(&self, id: &CategoryId) -> Result<()> {
        write::delete(self, id).await
    }
}

// SQLite-specific constructors
#[cfg(feature = "sqlite")]
impl TreeStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    pub async fn open_sqlite<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        // mode=rwc: read-write-create
        let url = format!("sqlite:{}?mode=rwc", path.as_ref().display());
        Self::connect_sqlite(&url).await
    }

    /// Connect to a SQLite database using a connection URL.
    pub async fn connect_sqlite(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let is_in_memory = url.contains("mode=memory");

        // An in-memory SQLite database is destroyed when its last connection
        // closes, so keep at least one connection alive forever.
        let mut options = AnyPoolOptions::new().max_connections(5);
        if is_in_memory {
            options = options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        // Cascading deletes depend on foreign keys, which SQLite enforces
        // per connection.
        let pool = options
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
                        .await?;
                    Ok(())
                })
            })
            .connect(url)
            .await
            .sql_context("Failed to connect to SQLite")?;

        if !is_in_memory {
            // WAL and synchronous are database-level settings; once is enough.
            sqlx::query("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")
                .execute(&pool)
                .await
                .sql_context("Failed to configure SQLite")?;
        }

        let store = Self {
            pool,
            kind: DbKind::Sqlite,
        };

        schema::initialize(&store).await?;

        Ok(store)
    }

    /// Create an in-memory SQLite store.
    ///
    /// The database exists only for the lifetime of this store instance.
    /// Useful for testing.
    pub async fn sqlite_in_memory() -> Result<Self> {
        // Shared cache mode so all pooled connections see the same database;
        // a unique name per instance avoids sharing between tests.
        let unique_id = uuid::Uuid::new_v4();
        let url = format!("sqlite:file:mem_{unique_id}?mode=memory&cache=shared");
        Self::connect_sqlite(&url).await
    }
}

// PostgreSQL-specific constructors
#[cfg(feature = "postgres")]
impl TreeStore {
    /// Connect to a PostgreSQL database using a connection URL.
    ///
    /// This connects to the default (public) schema. For test isolation, use
    /// [`TreeStore::connect_postgres_isolated`] instead.
    pub async fn connect_postgres(url: &str) -> Result<Self> {
        Self::connect_postgres_with_schema(url, None).await
    }

    /// Connect to PostgreSQL with an optional schema for isolation.
    ///
    /// When `schema_name` is given, the schema is created if missing and
    /// every pooled connection sets its `search_path` to it, so parallel
    /// test runs don't interfere with each other.
    async fn connect_postgres_with_schema(url: &str, schema_name: Option<String>) -> Result<Self> {
        sqlx::any::install_default_drivers();

        if let Some(ref schema) = schema_name {
            let temp_pool = AnyPoolOptions::new()
                .max_connections(1)
                .connect(url)
                .await
                .sql_context("Failed to connect to PostgreSQL")?;

            let create_schema = format!("CREATE SCHEMA IF NOT EXISTS {schema}");
            sqlx::query(&create_schema)
                .execute(&temp_pool)
                .await
                .sql_context(&format!("Failed to create schema {schema}"))?;

            temp_pool.close().await;
        }

        // Isolated (test) pools stay small with a generous acquire timeout,
        // so parallel test runs wait for connections instead of exhausting
        // the server's max_connections.
        let schema_for_hook = schema_name.clone();
        let mut pool_options = AnyPoolOptions::new();
        if schema_name.is_some() {
            pool_options = pool_options
                .max_connections(2)
                .acquire_timeout(std::time::Duration::from_secs(30));
        } else {
            pool_options = pool_options.max_connections(5);
        }

        let pool = pool_options
            .after_connect(move |conn, _meta| {
                let schema = schema_for_hook.clone();
                Box::pin(async move {
                    if let Some(ref s) = schema {
                        let set_path = format!("SET search_path TO {s}");
                        conn.execute(set_path.as_str()).await?;
                    }
                    Ok(())
                })
            })
            .connect(url)
            .await
            .sql_context("Failed to connect to PostgreSQL")?;

        let store = Self {
            pool,
            kind: DbKind::Postgres,
        };

        schema::initialize(&store).await?;

        Ok(store)
    }

    /// Connect to PostgreSQL with a unique schema for this store instance,
    /// ensuring parallel tests don't interfere with each other.
    pub async fn connect_postgres_isolated(url: &str) -> Result<Self> {
        // PostgreSQL schema names must start with a letter and be lowercase.
        let unique_id = uuid::Uuid::new_v4().simple().to_string();
        let schema_name = format!("test_{unique_id}");
        Self::connect_postgres_with_schema(url, Some(schema_name)).await
    }
}
