//! Serve command - runs the taxa HTTP server.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::backend::create_store;
use crate::cli::ServeArgs;

/// Run the taxa server
pub async fn run(args: &ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("taxa=info".parse()?))
        .init();

    let store = Arc::new(create_store(args).await?);
    let app = taxa::service::router(store);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    println!("taxa server starting on http://{local_addr}");
    println!();
    println!("Available endpoints:");
    println!("  GET  /api/v0/categories/{{id}} - category with parents, children, siblings");
    println!("  POST /api/v0/categories      - create a subtree atomically");
    println!("  GET  /health                 - health check");

    tracing::info!("listening on {local_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
