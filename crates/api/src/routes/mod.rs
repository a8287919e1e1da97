//! REST API routes.

pub mod accounts;
pub mod aging;
pub mod health;
pub mod invoices;
pub mod patient_ledgers;
pub mod payments;
pub mod settings;
pub mod sync;
pub mod vouchers;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use charak_core::ledger::LedgerError;
use charak_core::payments::PaymentError;
use charak_core::sync::SyncError;

use crate::AppState;

/// Merges all route groups.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(vouchers::routes())
        .merge(patient_ledgers::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
        .merge(aging::routes())
        .merge(sync::routes())
        .merge(settings::routes())
}

pub(crate) fn error_response(status: u16, code: &str, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}

pub(crate) fn ledger_error(err: &LedgerError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

pub(crate) fn payment_error(err: &PaymentError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

pub(crate) fn sync_error(err: &SyncError) -> Response {
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

pub(crate) fn bad_request(message: &str) -> Response {
    error_response(400, "VALIDATION_ERROR", message)
}
