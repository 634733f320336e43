pub mod api; // HTTP API router + server lifecycle
pub mod brochure; // Aftercare checklist corpus + progress
pub mod config;
pub mod core_state; // Shared connection + corpus
pub mod dashboard;
pub mod db;
pub mod export;
pub mod journal; // Symptom log
pub mod models;
pub mod profile;
pub mod recovery; // Recovery progress scoring
pub mod validation;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::Args;
use crate::core_state::{CoreError, CoreState};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to open database: {0}")]
    Core(#[from] CoreError),
    #[error(transparent)]
    Server(#[from] api::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(#[from] std::io::Error),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Open the store, serve the API and block until Ctrl-C.
pub async fn run(args: Args) -> Result<(), RunError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    tracing::info!(database = %args.database.display(), "Opening database");

    let core = Arc::new(CoreState::open(&args.database)?);
    let mut server =
        api::start_api_server(core, args.listen, args.allowed_origin.as_deref()).await?;
    tracing::info!(addr = %server.session.server_addr, "Listening");

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.stopped().await;
    Ok(())
}
