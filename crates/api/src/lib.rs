//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The ledger query and mutation surface
//! - Sync control routes (manual runs, config, export download, webhook)
//! - Response types projecting signed balances into debit/credit columns

pub mod routes;

use std::sync::Arc;

use axum::Router;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use charak_core::sync::PushEvent;
use charak_store::MemStore;
use charak_store::sync::SyncEngine;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The shared store.
    pub store: MemStore,
    /// The sync engine.
    pub engine: Arc<SyncEngine>,
    /// Channel feeding push events to the listener task.
    pub push_tx: mpsc::Sender<PushEvent>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
