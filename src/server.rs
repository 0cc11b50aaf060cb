use std::{io, net::SocketAddr, sync::Arc};

use tokio::sync::RwLock;

use crate::domain::Cookbook;

pub mod handlers;
mod routes;

pub use routes::router;

/// State shared by every request handler.
#[derive(Debug, Default)]
pub struct ServerState {
    /// The cookbook served by this instance.
    pub cookbook: Cookbook,
}

impl ServerState {
    /// Wraps a cookbook for sharing between handlers.
    #[must_use]
    pub const fn new(cookbook: Cookbook) -> Self {
        Self { cookbook }
    }

    /// Wraps the state in the lock the router expects.
    #[must_use]
    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

/// The handle each handler receives.
///
/// Creation holds the write guard for its whole check-then-insert sequence;
/// reads share the read guard.
pub type SharedState = Arc<RwLock<ServerState>>;

/// Serves the cookbook over HTTP until the process receives Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: SharedState) -> io::Result<()> {
    let entries = state.read().await.cookbook.len();
    tracing::info!(%addr, entries, "starting cookbook server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "ready to serve");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {error}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
