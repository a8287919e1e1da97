//! Charak API Server
//!
//! Main entry point for the Charak ledger backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charak_api::{AppState, create_router};
use charak_core::sync::ExternalSyncConfig;
use charak_shared::AppConfig;
use charak_store::MemStore;
use charak_store::sync::{HttpExternalClient, SyncEngine, run_listener, run_scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charak=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;

    // Seed the store with the sync configuration row
    let store = MemStore::new(ExternalSyncConfig::from_defaults(&config.external));
    info!(
        external_host = %config.external.host,
        external_port = %config.external.port,
        "store initialized"
    );

    // Sync engine plus its background tasks
    let engine = Arc::new(SyncEngine::new(
        store.clone(),
        Arc::new(HttpExternalClient::new()),
    ));
    let (push_tx, push_rx) = mpsc::channel(256);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(run_scheduler(Arc::clone(&engine), shutdown_rx));
    tokio::spawn(run_listener(Arc::clone(&engine), push_rx));

    // Create application state and router
    let state = AppState {
        store,
        engine,
        push_tx,
    };
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    // Stop background tasks on the way out
    let _ = shutdown_tx.send(true);

    Ok(())
}
