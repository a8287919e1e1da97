//! Push event intake.
//!
//! The persistent connection to the external system terminates outside this
//! process; typed events arrive over a channel (fed by the webhook route)
//! and are handed to the engine one at a time.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use charak_core::sync::PushEvent;

use super::engine::SyncEngine;

/// Consumes push events until the channel closes.
pub async fn run_listener(engine: Arc<SyncEngine>, mut events: mpsc::Receiver<PushEvent>) {
    info!("push listener started");
    while let Some(event) = events.recv().await {
        engine.handle_push_event(event).await;
    }
    info!("push listener stopped");
}
