//! Timestamp HTTP server binary.
//!
//! # Environment Variables
//!
//! - `HOST` — Bind address (default: 0.0.0.0)
//! - `PORT` — HTTP port (default: 8080)
//! - `TIMESTAMP_ACQUIRE_TIMEOUT_MS` — Optional bound on waiting for the store
//! - `TIMESTAMP_LEASE_TIMEOUT_MS` — Optional bound on holding the store
//! - `RUST_LOG` — Tracing filter (default: "info,timestamp_service=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! curl -H 'Content-Type: text/plain' -d 1740863149 localhost:8080/timestamp
//! ```

use anyhow::Context;
use timestamp_service::server::{serve, ServerConfig};
use timestamp_service::TimestampStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,timestamp_service=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store = TimestampStore::with_config(config.cell);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;

    serve(listener, store.clone(), shutdown_signal())
        .await
        .context("server failed")?;

    // No handler is running any more, so stopping cannot race a request.
    store.stop().await?;
    tracing::info!("timestamp store stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
