//! Sync control routes: configuration, manual runs, export download, the
//! push webhook and cached external read views.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::warn;

use charak_core::sync::{
    ExportKind, FieldMapping, PushEvent, SyncDirection, SyncFrequency,
};
use charak_store::repositories::{SyncConfigUpdate, SyncRepository};

use crate::AppState;
use crate::routes::{bad_request, error_response, sync_error};

/// Creates the sync routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sync/config", get(get_config))
        .route("/sync/config", put(update_config))
        .route("/sync/runs", get(recent_runs))
        .route("/sync/runs", post(trigger_sync))
        .route("/sync/export", get(export_download))
        .route("/sync/events", post(push_event))
        .route("/sync/external/ledgers", get(external_ledgers))
        .route("/sync/external/vouchers", get(external_vouchers))
}

/// Request body for updating the sync configuration.
#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    /// External system host.
    pub host: Option<String>,
    /// External system port.
    pub port: Option<u16>,
    /// Company identifier.
    pub company: Option<String>,
    /// Whether synchronization runs at all.
    pub sync_enabled: Option<bool>,
    /// Frequency: manual, hourly, daily or real-time.
    pub sync_frequency: Option<String>,
    /// Whether re-imports overwrite previously imported fields.
    pub update_existing: Option<bool>,
    /// Field-name mapping rules.
    pub mapping: Option<FieldMapping>,
}

/// Request body for triggering a manual run.
#[derive(Debug, Deserialize)]
pub struct TriggerSyncRequest {
    /// Direction: import, export or bidirectional.
    pub direction: SyncDirection,
}

/// Query parameters for listing runs.
#[derive(Debug, Deserialize)]
pub struct RecentRunsQuery {
    /// How many runs to return (default 20).
    pub limit: Option<usize>,
}

/// Query parameters for the export download.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Export kind: ledgers, vouchers or full.
    pub kind: String,
}

/// GET `/sync/config` - The current configuration row.
async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    let config = SyncRepository::new(state.store).config();
    (StatusCode::OK, Json(json!({ "config": config }))).into_response()
}

/// PUT `/sync/config` - Partially update the configuration.
///
/// The engine re-reads the row at the start of every run and scheduler
/// tick, so edits take effect without a restart.
async fn update_config(
    State(state): State<AppState>,
    Json(body): Json<UpdateConfigRequest>,
) -> impl IntoResponse {
    let frequency = match body.sync_frequency.as_deref() {
        None => None,
        Some(raw) => match SyncFrequency::from_str(raw) {
            Ok(frequency) => Some(frequency),
            Err(message) => return bad_request(&message),
        },
    };

    let config = SyncRepository::new(state.store).update_config(SyncConfigUpdate {
        host: body.host,
        port: body.port,
        company: body.company,
        sync_enabled: body.sync_enabled,
        frequency,
        update_existing: body.update_existing,
        mapping: body.mapping,
    });
    (StatusCode::OK, Json(json!({ "config": config }))).into_response()
}

/// GET `/sync/runs` - Run history, newest first.
async fn recent_runs(
    State(state): State<AppState>,
    Query(query): Query<RecentRunsQuery>,
) -> impl IntoResponse {
    let runs = SyncRepository::new(state.store).recent_runs(query.limit.unwrap_or(20));
    (StatusCode::OK, Json(json!({ "runs": runs }))).into_response()
}

/// POST `/sync/runs` - Trigger a manual run.
///
/// Rejected immediately (not queued) while another run is in flight. The
/// response carries imported-vs-failed counts, not just a boolean.
async fn trigger_sync(
    State(state): State<AppState>,
    Json(body): Json<TriggerSyncRequest>,
) -> impl IntoResponse {
    match state.engine.perform_sync(body.direction).await {
        Ok(run) => (StatusCode::OK, Json(json!({ "run": run }))).into_response(),
        Err(err) => sync_error(&err),
    }
}

/// GET `/sync/export?kind=` - Download an export document.
async fn export_download(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let Ok(kind) = ExportKind::from_str(&query.kind) else {
        return bad_request(&format!("Unknown export kind: {}", query.kind));
    };

    match state.engine.export_document(kind) {
        Ok((file_name, body)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{file_name}\""),
                ),
            ],
            body,
        )
            .into_response(),
        Err(err) => sync_error(&err),
    }
}

/// POST `/sync/events` - Webhook receiving push notifications.
///
/// Events are queued to the listener task; the webhook never blocks on a
/// sync run.
async fn push_event(
    State(state): State<AppState>,
    Json(event): Json<PushEvent>,
) -> impl IntoResponse {
    match state.push_tx.try_send(event) {
        Ok(()) => (StatusCode::ACCEPTED, Json(json!({ "queued": true }))).into_response(),
        Err(err) => {
            warn!(error = %err, "push event dropped");
            error_response(503, "PUSH_QUEUE_FULL", "Push event queue is full")
        }
    }
}

/// GET `/sync/external/ledgers` - Cached external ledger view.
async fn external_ledgers(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.external_ledgers().await {
        Ok(view) => (StatusCode::OK, Json(json!({ "ledgers": *view }))).into_response(),
        Err(err) => sync_error(&err),
    }
}

/// GET `/sync/external/vouchers` - Cached external voucher view.
async fn external_vouchers(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.external_vouchers().await {
        Ok(view) => (StatusCode::OK, Json(json!({ "vouchers": *view }))).into_response(),
        Err(err) => sync_error(&err),
    }
}
