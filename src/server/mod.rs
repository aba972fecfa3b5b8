//! HTTP transport for the timestamp store.
//!
//! # Endpoints
//!
//! - `GET  /timestamp` — Current value as decimal unix seconds
//! - `POST /timestamp` — Store the decimal unix seconds in the body
//!
//! Every route requires `Content-Type: text/plain`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

use std::future::Future;

use tokio::net::TcpListener;

use crate::store::TimestampStore;

pub use config::{ConfigError, ServerConfig};
pub use error::TimestampRequestError;
pub use routes::{app_router, AppState};

/// Serve the router on `listener` until `shutdown` resolves.
///
/// In-flight requests are drained before this returns. The store is left
/// running; stop it afterwards so no handler sees it closed.
pub async fn serve<F>(
    listener: TcpListener,
    store: TimestampStore,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let app = app_router(AppState::new(store));

    tracing::info!(%addr, "timestamp server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("timestamp server stopped");

    Ok(())
}
