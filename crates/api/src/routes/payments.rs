//! Payment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use charak_core::payments::{PaymentMode, PaymentStatus, RecordPaymentInput};
use charak_shared::types::{InvoiceId, PatientId, PaymentId};
use charak_store::repositories::PaymentRepository;

use crate::AppState;
use crate::routes::{bad_request, payment_error};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments))
        .route("/payments", post(record_payment))
        .route("/payments/{payment_id}/status", post(update_status))
        .route("/payments/{payment_id}/allocations", get(list_allocations))
        .route("/payments/{payment_id}/allocations", post(allocate))
}

/// Query parameters for listing payments.
#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    /// Filter by patient.
    pub patient_id: Option<Uuid>,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// The paying patient.
    pub patient_id: Uuid,
    /// Date the payment was received.
    pub payment_date: NaiveDate,
    /// Payment mode: cash, card, upi, cheque or bank_transfer.
    pub mode: String,
    /// Payment amount.
    pub amount: String,
    /// Bank name for cheque/transfer payments.
    pub bank_name: Option<String>,
    /// Cheque number.
    pub cheque_number: Option<String>,
    /// Cheque date.
    pub cheque_date: Option<NaiveDate>,
}

/// Request body for a manual status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status: cleared or bounced.
    pub status: String,
}

/// Request body for allocating a payment against an invoice.
#[derive(Debug, Deserialize)]
pub struct AllocateRequest {
    /// The invoice to settle.
    pub invoice_id: Uuid,
    /// Allocation amount.
    pub amount: String,
}

fn parse_mode(raw: &str) -> Option<PaymentMode> {
    match raw.trim().to_lowercase().as_str() {
        "cash" => Some(PaymentMode::Cash),
        "card" => Some(PaymentMode::Card),
        "upi" => Some(PaymentMode::Upi),
        "cheque" => Some(PaymentMode::Cheque),
        "bank_transfer" => Some(PaymentMode::BankTransfer),
        _ => None,
    }
}

fn parse_status(raw: &str) -> Option<PaymentStatus> {
    match raw.trim().to_lowercase().as_str() {
        "cleared" => Some(PaymentStatus::Cleared),
        "pending" => Some(PaymentStatus::Pending),
        "bounced" => Some(PaymentStatus::Bounced),
        _ => None,
    }
}

/// GET `/payments` - List payments, newest first.
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> impl IntoResponse {
    let payments = PaymentRepository::new(state.store)
        .list(query.patient_id.map(PatientId::from_uuid));
    (StatusCode::OK, Json(json!({ "payments": payments }))).into_response()
}

/// POST `/payments` - Record a payment.
async fn record_payment(
    State(state): State<AppState>,
    Json(body): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    let Some(mode) = parse_mode(&body.mode) else {
        return bad_request(&format!("Unknown payment mode: {}", body.mode));
    };
    let Ok(amount) = Decimal::from_str(&body.amount) else {
        return bad_request(&format!("Invalid amount: {}", body.amount));
    };

    match PaymentRepository::new(state.store).record(RecordPaymentInput {
        patient_id: PatientId::from_uuid(body.patient_id),
        payment_date: body.payment_date,
        mode,
        amount,
        bank_name: body.bank_name,
        cheque_number: body.cheque_number,
        cheque_date: body.cheque_date,
    }) {
        Ok(payment) => {
            (StatusCode::CREATED, Json(json!({ "payment": payment }))).into_response()
        }
        Err(err) => payment_error(&err),
    }
}

/// POST `/payments/{payment_id}/status` - Clear or bounce a pending cheque.
async fn update_status(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let Some(status) = parse_status(&body.status) else {
        return bad_request(&format!("Unknown payment status: {}", body.status));
    };

    match PaymentRepository::new(state.store)
        .update_status(PaymentId::from_uuid(payment_id), status)
    {
        Ok(payment) => (StatusCode::OK, Json(json!({ "payment": payment }))).into_response(),
        Err(err) => payment_error(&err),
    }
}

/// GET `/payments/{payment_id}/allocations` - List a payment's allocations.
async fn list_allocations(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let allocations = PaymentRepository::new(state.store)
        .list_allocations(Some(PaymentId::from_uuid(payment_id)));
    (StatusCode::OK, Json(json!({ "allocations": allocations }))).into_response()
}

/// POST `/payments/{payment_id}/allocations` - Allocate against an invoice.
///
/// The allocation posts a receipt voucher, decrements the invoice's
/// outstanding amount and the payment's unallocated remainder.
async fn allocate(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
    Json(body): Json<AllocateRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&body.amount) else {
        return bad_request(&format!("Invalid amount: {}", body.amount));
    };

    match PaymentRepository::new(state.store).allocate(
        PaymentId::from_uuid(payment_id),
        InvoiceId::from_uuid(body.invoice_id),
        amount,
    ) {
        Ok(allocation) => {
            info!(
                payment_id = %allocation.payment_id,
                invoice_id = %allocation.invoice_id,
                "payment allocated"
            );
            (StatusCode::CREATED, Json(json!({ "allocation": allocation }))).into_response()
        }
        Err(err) => payment_error(&err),
    }
}
