//! Timer-driven sync scheduling.
//!
//! The configuration is re-read on every tick, so enabling, disabling or
//! changing the frequency takes effect without a restart. Disabling never
//! aborts a run already in flight; it only stops future scheduled runs.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use charak_core::sync::{SyncDirection, SyncError};

use super::engine::SyncEngine;

/// How often to re-check the configuration when no timer is active.
const RECHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Runs scheduled syncs until `shutdown` flips to true.
pub async fn run_scheduler(engine: Arc<SyncEngine>, mut shutdown: watch::Receiver<bool>) {
    info!("sync scheduler started");
    loop {
        let config = engine.config();
        let wait = if config.sync_enabled {
            config.frequency.poll_interval().unwrap_or(RECHECK_INTERVAL)
        } else {
            RECHECK_INTERVAL
        };

        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            result = shutdown.changed() => {
                if result.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        // Re-read: edits during the sleep take effect now.
        let config = engine.config();
        if !config.sync_enabled || config.frequency.poll_interval().is_none() {
            continue;
        }

        match engine.perform_sync(SyncDirection::Bidirectional).await {
            Ok(run) => debug!(
                run_id = %run.id,
                status = ?run.status,
                "scheduled sync finished"
            ),
            Err(SyncError::AlreadySyncing) => {
                debug!("scheduled sync skipped; run already in progress");
            }
            Err(err) => warn!(error = %err, "scheduled sync could not start"),
        }
    }
    info!("sync scheduler stopped");
}
