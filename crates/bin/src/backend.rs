//! Store creation and utility functions.

use std::path::PathBuf;

use taxa::TreeStore;

use crate::cli::{Backend, ServeArgs};

/// Redact credentials from a PostgreSQL connection URL for safe logging
pub fn redact_postgres_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        let mut redacted = parsed.clone();
        if !parsed.username().is_empty() {
            let _ = redacted.set_username("***");
        }
        if parsed.password().is_some() {
            let _ = redacted.set_password(Some("***"));
        }
        redacted.to_string()
    } else {
        "postgres://***@<unparsable-url>".to_string()
    }
}

/// Create the appropriate store based on configuration
pub async fn create_store(args: &ServeArgs) -> Result<TreeStore, Box<dyn std::error::Error>> {
    match args.backend {
        Backend::Sqlite => {
            let data_dir = args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));
            tokio::fs::create_dir_all(&data_dir).await?;

            let db_path = data_dir.join("taxa.db");
            tracing::info!("Using SQLite store at {}", db_path.display());
            Ok(TreeStore::open_sqlite(&db_path).await?)
        }
        Backend::Postgres => {
            let pg_url = args
                .postgres_url
                .as_ref()
                .ok_or("PostgreSQL backend requires --postgres-url or TAXA_POSTGRES_URL")?;

            let display_url = redact_postgres_url(pg_url);
            tracing::info!("Connecting to PostgreSQL at {}", display_url);

            match TreeStore::connect_postgres(pg_url).await {
                Ok(store) => {
                    tracing::info!("Connected to PostgreSQL successfully");
                    Ok(store)
                }
                Err(e) => {
                    Err(format!("Failed to connect to PostgreSQL at {display_url}: {e}").into())
                }
            }
        }
    }
}
