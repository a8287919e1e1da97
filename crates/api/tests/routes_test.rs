//! Router-level tests exercising the ledger surface end to end.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower::ServiceExt;

use charak_api::{AppState, create_router};
use charak_core::sync::ExternalSyncConfig;
use charak_shared::config::ExternalConfig;
use charak_store::MemStore;
use charak_store::sync::{HttpExternalClient, SyncEngine};

fn make_app() -> (Router, mpsc::Receiver<charak_core::sync::PushEvent>) {
    let store = MemStore::new(ExternalSyncConfig::from_defaults(&ExternalConfig {
        host: "localhost".to_string(),
        port: 9000,
        company: String::new(),
        sync_enabled: false,
        sync_frequency: "manual".to_string(),
        update_existing: false,
    }));
    let engine = Arc::new(SyncEngine::new(
        store.clone(),
        Arc::new(HttpExternalClient::new()),
    ));
    let (push_tx, push_rx) = mpsc::channel(8);
    (
        create_router(AppState {
            store,
            engine,
            push_tx,
        }),
        push_rx,
    )
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let (app, _rx) = make_app();
    let (status, body) = request(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn voucher_lifecycle_over_http() {
    let (app, _rx) = make_app();

    // Chart of accounts.
    let (status, income) = request(
        &app,
        "POST",
        "/api/v1/accounts",
        Some(json!({"code": "4000", "name": "Consultation Income", "type": "income"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, cash) = request(
        &app,
        "POST",
        "/api/v1/accounts",
        Some(json!({"code": "1000", "name": "Cash", "type": "asset"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let income_id = income["account"]["id"].as_str().unwrap().to_string();
    let cash_id = cash["account"]["id"].as_str().unwrap().to_string();

    // A balanced voucher posts.
    let (status, created) = request(
        &app,
        "POST",
        "/api/v1/vouchers",
        Some(json!({
            "type": "journal",
            "date": "2026-02-01",
            "narration": "Consultation",
            "entries": [
                {"account_id": cash_id, "side": "debit", "amount": "500"},
                {"account_id": income_id, "side": "credit", "amount": "500"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["voucher"]["number"], "JV-000001");
    assert_eq!(created["voucher"]["status"], "posted");
    assert_eq!(created["voucher"]["entries"][0]["debit"], "500");
    assert_eq!(created["voucher"]["entries"][0]["credit"], "0");

    // An unbalanced voucher is rejected naming the breached invariant.
    let (status, rejected) = request(
        &app,
        "POST",
        "/api/v1/vouchers",
        Some(json!({
            "type": "journal",
            "date": "2026-02-01",
            "narration": "Broken",
            "entries": [
                {"account_id": cash_id, "side": "debit", "amount": "500"},
                {"account_id": income_id, "side": "credit", "amount": "300"}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected["error"], "UNBALANCED_VOUCHER");
    assert!(
        rejected["message"]
            .as_str()
            .unwrap()
            .contains("differ by 200")
    );

    // The failed attempt consumed nothing.
    let (_, listed) = request(&app, "GET", "/api/v1/vouchers", None).await;
    assert_eq!(listed["vouchers"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(listed["vouchers"]["meta"]["total"], 1);

    // Income balance computed on demand.
    let (status, balance) = request(
        &app,
        "GET",
        &format!("/api/v1/accounts/{income_id}/balance"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance["balance"], "500");
    assert_eq!(balance["side"], "credit");
}

#[tokio::test]
async fn manual_sync_rejected_while_disabled() {
    let (app, _rx) = make_app();
    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/sync/runs",
        Some(json!({"direction": "import"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "SYNC_DISABLED");
}

#[tokio::test]
async fn push_webhook_queues_events() {
    let (app, mut rx) = make_app();
    let (status, body) = request(
        &app,
        "POST",
        "/api/v1/sync/events",
        Some(json!({"kind": "ledger_updated", "identifier": "Cash"})),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["queued"], true);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.identifier, "Cash");
}
