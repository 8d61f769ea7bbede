use taxa::{Category, SubtreeInserter, SubtreeSpec, TreeStore};

/// Creates a test store based on TEST_BACKEND env var.
///
/// Supported values:
/// - "sqlite" or unset: SQLite in-memory store (default)
/// - "postgres": PostgreSQL via TEST_POSTGRES_URL, schema-isolated per store
///
/// # Example
/// ```bash
/// # Run tests against SQLite (default)
/// cargo test
///
/// # Run tests against PostgreSQL
/// TEST_BACKEND=postgres TEST_POSTGRES_URL="postgres://localhost/taxa_test" cargo test
/// ```
pub async fn test_store() -> TreeStore {
    match std::env::var("TEST_BACKEND").as_deref() {
        Ok("postgres") => {
            let url = std::env::var("TEST_POSTGRES_URL")
                .unwrap_or_else(|_| "postgres://localhost/taxa_test".to_string());
            TreeStore::connect_postgres_isolated(&url)
                .await
                .expect("Failed to connect to PostgreSQL")
        }
        Ok("sqlite") | Ok("") | Err(_) => TreeStore::sqlite_in_memory()
            .await
            .expect("Failed to create SQLite store"),
        Ok(other) => {
            panic!("Unknown TEST_BACKEND value: {other}. Supported: sqlite, postgres")
        }
    }
}

/// Owned name list from string literals.
pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Name set of a category list, for order-insensitive assertions.
pub fn name_set(categories: &[Category]) -> std::collections::HashSet<String> {
    categories.iter().map(|c| c.name.clone()).collect()
}

/// Creates a subtree through the full insert protocol, panicking on failure.
pub async fn create_tree(store: &TreeStore, spec: &SubtreeSpec) -> Category {
    SubtreeInserter::new(store)
        .insert(spec)
        .await
        .expect("Failed to create subtree")
}
