//! Outstanding invoice routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use charak_core::receivables::RecordInvoiceInput;
use charak_shared::types::PatientId;
use charak_store::repositories::{InvoiceFilter, InvoiceRepository};

use crate::AppState;
use crate::routes::{bad_request, ledger_error};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(record_invoice))
}

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Filter by patient.
    pub patient_id: Option<Uuid>,
    /// Invoice date range start.
    pub from: Option<NaiveDate>,
    /// Invoice date range end.
    pub to: Option<NaiveDate>,
    /// Only invoices with outstanding amounts.
    #[serde(default)]
    pub open: bool,
}

/// Request body for recording an invoice.
#[derive(Debug, Deserialize)]
pub struct RecordInvoiceRequest {
    /// The patient billed.
    pub patient_id: Uuid,
    /// Date the invoice was raised.
    pub invoice_date: NaiveDate,
    /// Date payment falls due.
    pub due_date: NaiveDate,
    /// Invoice amount.
    pub amount: String,
    /// Bill reference, if any.
    pub bill_ref: Option<String>,
}

/// GET `/invoices` - List invoices with filters.
async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> impl IntoResponse {
    let filter = InvoiceFilter {
        patient_id: query.patient_id.map(PatientId::from_uuid),
        from: query.from,
        to: query.to,
        open_only: query.open,
    };
    let invoices = InvoiceRepository::new(state.store).list(&filter);
    (StatusCode::OK, Json(json!({ "invoices": invoices }))).into_response()
}

/// POST `/invoices` - Record an invoice with its full amount outstanding.
async fn record_invoice(
    State(state): State<AppState>,
    Json(body): Json<RecordInvoiceRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&body.amount) else {
        return bad_request(&format!("Invalid amount: {}", body.amount));
    };

    match InvoiceRepository::new(state.store).record(RecordInvoiceInput {
        patient_id: PatientId::from_uuid(body.patient_id),
        invoice_date: body.invoice_date,
        due_date: body.due_date,
        amount,
        bill_ref: body.bill_ref,
    }) {
        Ok(invoice) => {
            (StatusCode::CREATED, Json(json!({ "invoice": invoice }))).into_response()
        }
        Err(err) => ledger_error(&err),
    }
}
