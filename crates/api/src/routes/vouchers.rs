//! Voucher routes.
//!
//! Entries cross this boundary in two-column debit/credit form; internally
//! they are a single signed side+amount.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use charak_core::ledger::{
    CreateVoucherInput, EntryInput, EntryTarget, Voucher, VoucherStatus, VoucherType,
};
use charak_shared::types::{AccountId, BalanceSide, PageRequest, PageResponse, PatientId, VoucherId};
use charak_store::repositories::{VoucherFilter, VoucherRepository};

use crate::AppState;
use crate::routes::{bad_request, ledger_error};

/// Creates the voucher routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vouchers", get(list_vouchers))
        .route("/vouchers", post(create_voucher))
        .route("/vouchers/{voucher_id}", get(get_voucher))
        .route("/vouchers/{voucher_id}/cancel", post(cancel_voucher))
        .route("/vouchers/{voucher_id}/reverse", post(reverse_voucher))
}

/// Query parameters for listing vouchers.
#[derive(Debug, Deserialize)]
pub struct ListVouchersQuery {
    /// Date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by patient.
    pub patient_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for one voucher entry.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// Account the entry posts under.
    pub account_id: Uuid,
    /// Patient, when the entry targets a patient ledger.
    pub patient_id: Option<Uuid>,
    /// Entry side: `debit` or `credit`.
    pub side: String,
    /// Entry amount (positive).
    pub amount: String,
    /// Optional line narration.
    pub narration: Option<String>,
}

/// Request body for creating a voucher.
#[derive(Debug, Deserialize)]
pub struct CreateVoucherRequest {
    /// Voucher type: journal, receipt, payment or contra.
    #[serde(rename = "type")]
    pub voucher_type: String,
    /// Voucher date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Narration.
    pub narration: String,
    /// Related patient, if any.
    pub patient_id: Option<Uuid>,
    /// Bill reference, if any.
    pub bill_ref: Option<String>,
    /// The entries (must balance).
    pub entries: Vec<EntryRequest>,
}

/// Request body for reversing a voucher.
#[derive(Debug, Deserialize)]
pub struct ReverseVoucherRequest {
    /// Date for the contra voucher.
    pub date: NaiveDate,
    /// Reason recorded in the contra narration.
    pub reason: String,
}

/// Response for a voucher entry (two-column projection).
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Account the entry posts under.
    pub account_id: Uuid,
    /// Patient, when the entry targets a patient ledger.
    pub patient_id: Option<Uuid>,
    /// Debit amount (0 for credit entries).
    pub debit: String,
    /// Credit amount (0 for debit entries).
    pub credit: String,
    /// Line narration.
    pub narration: Option<String>,
}

/// Response for a voucher.
#[derive(Debug, Serialize)]
pub struct VoucherResponse {
    /// Voucher ID.
    pub id: Uuid,
    /// Voucher number.
    pub number: String,
    /// Voucher type.
    #[serde(rename = "type")]
    pub voucher_type: VoucherType,
    /// Voucher date.
    pub date: NaiveDate,
    /// Narration.
    pub narration: String,
    /// Related patient, if any.
    pub patient_id: Option<Uuid>,
    /// Bill reference, if any.
    pub bill_ref: Option<String>,
    /// Sum of either side's entries.
    pub total_amount: String,
    /// Lifecycle status.
    pub status: VoucherStatus,
    /// The entries.
    pub entries: Vec<EntryResponse>,
}

impl From<Voucher> for VoucherResponse {
    fn from(voucher: Voucher) -> Self {
        Self {
            id: voucher.id.into_inner(),
            number: voucher.number,
            voucher_type: voucher.voucher_type,
            date: voucher.date,
            narration: voucher.narration,
            patient_id: voucher.patient_id.map(PatientId::into_inner),
            bill_ref: voucher.bill_ref,
            total_amount: voucher.total_amount.to_string(),
            status: voucher.status,
            entries: voucher
                .entries
                .into_iter()
                .map(|entry| EntryResponse {
                    id: entry.id.into_inner(),
                    account_id: entry.target.account_id().into_inner(),
                    patient_id: entry.target.patient_id().map(PatientId::into_inner),
                    debit: entry.debit().to_string(),
                    credit: entry.credit().to_string(),
                    narration: entry.narration,
                })
                .collect(),
        }
    }
}

/// GET `/vouchers` - List vouchers with filters.
async fn list_vouchers(
    State(state): State<AppState>,
    Query(query): Query<ListVouchersQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        None => None,
        Some("pending") => Some(VoucherStatus::Pending),
        Some("posted") => Some(VoucherStatus::Posted),
        Some("cancelled") => Some(VoucherStatus::Cancelled),
        Some(other) => return bad_request(&format!("Unknown voucher status: {other}")),
    };

    let filter = VoucherFilter {
        from: query.from,
        to: query.to,
        status,
        patient_id: query.patient_id.map(PatientId::from_uuid),
    };
    let default_page = PageRequest::default();
    let page_request = PageRequest {
        page: query.page.unwrap_or(default_page.page),
        per_page: query.per_page.unwrap_or(default_page.per_page),
    };

    let vouchers = VoucherRepository::new(state.store).list(&filter);
    let total = vouchers.len() as u64;
    let page: Vec<VoucherResponse> = vouchers
        .into_iter()
        .skip(page_request.offset())
        .take(page_request.limit())
        .map(VoucherResponse::from)
        .collect();
    (
        StatusCode::OK,
        Json(json!({
            "vouchers":
                PageResponse::new(page, page_request.page, page_request.per_page, total)
        })),
    )
        .into_response()
}

/// POST `/vouchers` - Create and post a voucher.
async fn create_voucher(
    State(state): State<AppState>,
    Json(body): Json<CreateVoucherRequest>,
) -> impl IntoResponse {
    let Ok(voucher_type) = VoucherType::from_str(&body.voucher_type) else {
        return bad_request(&format!("Unknown voucher type: {}", body.voucher_type));
    };

    let mut entries = Vec::with_capacity(body.entries.len());
    for entry in &body.entries {
        let Ok(side) = BalanceSide::from_str(&entry.side) else {
            return bad_request(&format!("Unknown entry side: {}", entry.side));
        };
        let Ok(amount) = Decimal::from_str(&entry.amount) else {
            return bad_request(&format!("Invalid amount: {}", entry.amount));
        };
        let account_id = AccountId::from_uuid(entry.account_id);
        let target = match entry.patient_id {
            Some(patient) => EntryTarget::Patient {
                patient_id: PatientId::from_uuid(patient),
                account_id,
            },
            None => EntryTarget::Account(account_id),
        };
        entries.push(EntryInput {
            target,
            side,
            amount,
            narration: entry.narration.clone(),
        });
    }

    let input = CreateVoucherInput {
        voucher_type,
        date: body.date,
        narration: body.narration,
        patient_id: body.patient_id.map(PatientId::from_uuid),
        bill_ref: body.bill_ref,
        entries,
        correlation_key: None,
    };

    match VoucherRepository::new(state.store).create(input) {
        Ok(voucher) => {
            info!(number = %voucher.number, "voucher posted");
            (
                StatusCode::CREATED,
                Json(json!({ "voucher": VoucherResponse::from(voucher) })),
            )
                .into_response()
        }
        Err(err) => ledger_error(&err),
    }
}

/// GET `/vouchers/{voucher_id}` - Fetch one voucher with entries.
async fn get_voucher(
    State(state): State<AppState>,
    Path(voucher_id): Path<Uuid>,
) -> impl IntoResponse {
    match VoucherRepository::new(state.store).get(VoucherId::from_uuid(voucher_id)) {
        Ok(voucher) => (
            StatusCode::OK,
            Json(json!({ "voucher": VoucherResponse::from(voucher) })),
        )
            .into_response(),
        Err(err) => ledger_error(&err),
    }
}

/// POST `/vouchers/{voucher_id}/cancel` - Cancel a pending voucher.
async fn cancel_voucher(
    State(state): State<AppState>,
    Path(voucher_id): Path<Uuid>,
) -> impl IntoResponse {
    match VoucherRepository::new(state.store).cancel(VoucherId::from_uuid(voucher_id)) {
        Ok(voucher) => (
            StatusCode::OK,
            Json(json!({ "voucher": VoucherResponse::from(voucher) })),
        )
            .into_response(),
        Err(err) => ledger_error(&err),
    }
}

/// POST `/vouchers/{voucher_id}/reverse` - Post a contra voucher.
async fn reverse_voucher(
    State(state): State<AppState>,
    Path(voucher_id): Path<Uuid>,
    Json(body): Json<ReverseVoucherRequest>,
) -> impl IntoResponse {
    match VoucherRepository::new(state.store).reverse(
        VoucherId::from_uuid(voucher_id),
        body.date,
        &body.reason,
    ) {
        Ok(contra) => {
            info!(number = %contra.number, "contra voucher posted");
            (
                StatusCode::CREATED,
                Json(json!({ "voucher": VoucherResponse::from(contra) })),
            )
                .into_response()
        }
        Err(err) => ledger_error(&err),
    }
}
