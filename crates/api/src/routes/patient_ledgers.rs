//! Patient ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use charak_core::patient_ledger::PatientLedger;
use charak_shared::types::{AccountId, BalanceSide, PatientId, PatientLedgerId};
use charak_store::repositories::PatientLedgerRepository;

use crate::AppState;
use crate::routes::{bad_request, ledger_error};

/// Creates the patient ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/patient-ledgers", get(list_ledgers))
        .route("/patient-ledgers", post(create_ledger))
        .route("/patient-ledgers/{ledger_id}", get(get_ledger))
        .route(
            "/patient-ledgers/{ledger_id}/recompute",
            post(recompute_ledger),
        )
}

/// Query parameters for listing patient ledgers.
#[derive(Debug, Deserialize)]
pub struct ListLedgersQuery {
    /// Filter by patient.
    pub patient_id: Option<Uuid>,
}

/// Request body for creating a patient ledger.
#[derive(Debug, Deserialize)]
pub struct CreateLedgerRequest {
    /// The patient.
    pub patient_id: Uuid,
    /// The account the ledger sits under.
    pub account_id: Uuid,
    /// Opening balance amount.
    pub opening_balance: Option<String>,
    /// Side the opening balance sits on.
    pub opening_side: Option<String>,
}

/// Response for a patient ledger; the signed balance is projected into
/// `(amount, side)` here, at the display boundary.
#[derive(Debug, Serialize)]
pub struct PatientLedgerResponse {
    /// Ledger ID.
    pub id: Uuid,
    /// The patient.
    pub patient_id: Uuid,
    /// The account the ledger sits under.
    pub account_id: Uuid,
    /// Opening balance amount.
    pub opening_balance: String,
    /// Side the opening balance sits on.
    pub opening_side: String,
    /// Current balance amount.
    pub balance: String,
    /// Side the current balance sits on.
    pub balance_side: String,
}

impl From<PatientLedger> for PatientLedgerResponse {
    fn from(ledger: PatientLedger) -> Self {
        let (balance, balance_side) = ledger.display_balance();
        Self {
            id: ledger.id.into_inner(),
            patient_id: ledger.patient_id.into_inner(),
            account_id: ledger.account_id.into_inner(),
            opening_balance: ledger.opening_balance.to_string(),
            opening_side: ledger.opening_side.to_string(),
            balance: balance.to_string(),
            balance_side: balance_side.to_string(),
        }
    }
}

/// GET `/patient-ledgers` - List ledgers, optionally for one patient.
async fn list_ledgers(
    State(state): State<AppState>,
    Query(query): Query<ListLedgersQuery>,
) -> impl IntoResponse {
    let ledgers: Vec<PatientLedgerResponse> = PatientLedgerRepository::new(state.store)
        .list(query.patient_id.map(PatientId::from_uuid))
        .into_iter()
        .map(PatientLedgerResponse::from)
        .collect();
    (StatusCode::OK, Json(json!({ "patient_ledgers": ledgers }))).into_response()
}

/// POST `/patient-ledgers` - Create a ledger with an opening balance.
async fn create_ledger(
    State(state): State<AppState>,
    Json(body): Json<CreateLedgerRequest>,
) -> impl IntoResponse {
    let opening_balance = match body.opening_balance.as_deref() {
        None => Decimal::ZERO,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(amount) => amount,
            Err(_) => return bad_request(&format!("Invalid opening balance: {raw}")),
        },
    };
    let opening_side = match body.opening_side.as_deref() {
        None => BalanceSide::Debit,
        Some(raw) => match BalanceSide::from_str(raw) {
            Ok(side) => side,
            Err(message) => return bad_request(&message),
        },
    };

    match PatientLedgerRepository::new(state.store).create(
        PatientId::from_uuid(body.patient_id),
        AccountId::from_uuid(body.account_id),
        opening_balance,
        opening_side,
    ) {
        Ok(ledger) => (
            StatusCode::CREATED,
            Json(json!({ "patient_ledger": PatientLedgerResponse::from(ledger) })),
        )
            .into_response(),
        Err(err) => ledger_error(&err),
    }
}

/// GET `/patient-ledgers/{ledger_id}` - Fetch one ledger.
async fn get_ledger(
    State(state): State<AppState>,
    Path(ledger_id): Path<Uuid>,
) -> impl IntoResponse {
    match PatientLedgerRepository::new(state.store).get(PatientLedgerId::from_uuid(ledger_id)) {
        Ok(ledger) => (
            StatusCode::OK,
            Json(json!({ "patient_ledger": PatientLedgerResponse::from(ledger) })),
        )
            .into_response(),
        Err(err) => ledger_error(&err),
    }
}

/// POST `/patient-ledgers/{ledger_id}/recompute` - Repair the balance by
/// replaying the posted entry history.
async fn recompute_ledger(
    State(state): State<AppState>,
    Path(ledger_id): Path<Uuid>,
) -> impl IntoResponse {
    match PatientLedgerRepository::new(state.store).recompute(PatientLedgerId::from_uuid(ledger_id))
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "patient_ledger": PatientLedgerResponse::from(outcome.ledger),
                "changed": outcome.changed,
            })),
        )
            .into_response(),
        Err(err) => ledger_error(&err),
    }
}
