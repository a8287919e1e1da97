//! Aging snapshot routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use charak_store::repositories::SnapshotRepository;

use crate::AppState;

/// Creates the aging routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/aging/snapshots", get(recent_snapshots))
        .route("/aging/snapshots", post(take_snapshot))
}

/// Query parameters for listing snapshots.
#[derive(Debug, Deserialize)]
pub struct RecentSnapshotsQuery {
    /// How many snapshots to return (default 10).
    pub limit: Option<usize>,
}

/// Request body for taking a snapshot.
#[derive(Debug, Deserialize)]
pub struct TakeSnapshotRequest {
    /// Reporting date the buckets are computed against.
    pub as_of: NaiveDate,
}

/// GET `/aging/snapshots` - Most recent snapshots, newest first.
async fn recent_snapshots(
    State(state): State<AppState>,
    Query(query): Query<RecentSnapshotsQuery>,
) -> impl IntoResponse {
    let snapshots = SnapshotRepository::new(state.store).recent(query.limit.unwrap_or(10));
    (StatusCode::OK, Json(json!({ "snapshots": snapshots }))).into_response()
}

/// POST `/aging/snapshots` - Bucket every open invoice and append an
/// immutable snapshot.
async fn take_snapshot(
    State(state): State<AppState>,
    Json(body): Json<TakeSnapshotRequest>,
) -> impl IntoResponse {
    let snapshot = SnapshotRepository::new(state.store).take(body.as_of);
    (StatusCode::CREATED, Json(json!({ "snapshot": snapshot }))).into_response()
}
