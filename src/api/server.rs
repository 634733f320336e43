//! API server lifecycle: starts/stops the axum HTTP server.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

/// Where a running API server is listening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSession {
    pub server_addr: String,
    pub port: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind API server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ApiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the serve task to finish. Call after [`ApiServer::shutdown`].
    pub async fn stopped(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("API server task failed: {e}");
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Start the API server on `addr`.
///
/// Port 0 binds an ephemeral port; the chosen one is reported in
/// `ApiServer::session`.
pub async fn start_api_server(
    core: Arc<CoreState>,
    addr: SocketAddr,
    allowed_origin: Option<&str>,
) -> Result<ApiServer, ServerError> {
    // 1. Bind
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    tracing::info!(%addr, "API server binding");

    // 2. Build the router
    let app = api_router(core, allowed_origin);

    // 3. Record the bound address
    let session = ApiSession {
        server_addr: addr.to_string(),
        port: addr.port(),
    };

    // 4. Set up shutdown signal
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    // 5. Spawn server in background task
    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
