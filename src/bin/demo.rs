//! Starts the server, stores `1740863149` through HTTP and prints what a
//! subsequent read returns.
//!
//! Honors the same environment variables as the `server` binary.

use anyhow::Context;
use timestamp_service::server::{serve, ServerConfig};
use timestamp_service::{TimestampClient, TimestampStore, TimestampValue};
use tokio::sync::oneshot;

const DEMO_TIMESTAMP: i64 = 1_740_863_149;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store = TimestampStore::with_config(config.cell);
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, store.clone(), async move {
        let _ = shutdown_rx.await;
    }));

    let client = TimestampClient::new(&format!("http://localhost:{}", addr.port()));
    client
        .set_timestamp(TimestampValue::from(DEMO_TIMESTAMP))
        .await
        .context("POST /timestamp failed")?;
    let current = client
        .get_timestamp()
        .await
        .context("GET /timestamp failed")?;
    println!("{current}");

    let _ = shutdown_tx.send(());
    server.await??;
    store.stop().await?;

    Ok(())
}
