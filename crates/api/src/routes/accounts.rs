//! Chart of accounts routes.

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

use charak_core::accounts::{Account, AccountType, NewAccount};
use charak_shared::types::{AccountId, BalanceSide};
use charak_store::repositories::AccountRepository;

use crate::AppState;
use crate::routes::{bad_request, ledger_error};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}/balance", get(account_balance))
        .route("/accounts/{account_id}/deactivate", post(deactivate_account))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Only active accounts.
    #[serde(default)]
    pub active: bool,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code (unique, sortable).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type: asset, liability, equity, income or expense.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Opening balance amount.
    pub opening_balance: Option<String>,
    /// Side the opening balance sits on.
    pub opening_side: Option<String>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Opening balance amount.
    pub opening_balance: String,
    /// Side the opening balance sits on.
    pub opening_side: String,
    /// Whether the account is active.
    pub active: bool,
    /// External correlation key, once matched.
    pub correlation_key: Option<String>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.into_inner(),
            code: account.code,
            name: account.name,
            account_type: account.account_type.to_string(),
            opening_balance: account.opening_balance.to_string(),
            opening_side: account.opening_side.to_string(),
            active: account.active,
            correlation_key: account.correlation_key,
        }
    }
}

/// GET `/accounts` - List the chart of accounts sorted by code.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    let accounts: Vec<AccountResponse> = AccountRepository::new(state.store)
        .list(query.active)
        .into_iter()
        .map(AccountResponse::from)
        .collect();
    (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let Ok(account_type) = AccountType::from_str(&body.account_type) else {
        return bad_request(&format!("Unknown account type: {}", body.account_type));
    };
    let opening_balance = match body.opening_balance.as_deref() {
        None => Decimal::ZERO,
        Some(raw) => match Decimal::from_str(raw) {
            Ok(amount) => amount,
            Err(_) => return bad_request(&format!("Invalid opening balance: {raw}")),
        },
    };
    let opening_side = match body.opening_side.as_deref() {
        None => account_type.normal_side(),
        Some(raw) => match BalanceSide::from_str(raw) {
            Ok(side) => side,
            Err(message) => return bad_request(&message),
        },
    };

    match AccountRepository::new(state.store).create(NewAccount {
        code: body.code,
        name: body.name,
        account_type,
        opening_balance,
        opening_side,
        correlation_key: None,
    }) {
        Ok(account) => (
            StatusCode::CREATED,
            Json(json!({ "account": AccountResponse::from(account) })),
        )
            .into_response(),
        Err(err) => ledger_error(&err),
    }
}

/// GET `/accounts/{account_id}` - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    match AccountRepository::new(state.store).get(AccountId::from_uuid(account_id)) {
        Ok(account) => (
            StatusCode::OK,
            Json(json!({ "account": AccountResponse::from(account) })),
        )
            .into_response(),
        Err(err) => ledger_error(&err),
    }
}

/// GET `/accounts/{account_id}/balance` - Balance computed from posted entries.
async fn account_balance(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    match AccountRepository::new(state.store).computed_balance(AccountId::from_uuid(account_id)) {
        Ok(computed) => {
            let (amount, side) = computed.balance.split();
            (
                StatusCode::OK,
                Json(json!({
                    "account_id": computed.account_id,
                    "debit_total": computed.debit_total.to_string(),
                    "credit_total": computed.credit_total.to_string(),
                    "balance": amount.to_string(),
                    "side": side.to_string(),
                })),
            )
                .into_response()
        }
        Err(err) => ledger_error(&err),
    }
}

/// POST `/accounts/{account_id}/deactivate` - Deactivate (never delete).
async fn deactivate_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    match AccountRepository::new(state.store).deactivate(AccountId::from_uuid(account_id)) {
        Ok(account) => (
            StatusCode::OK,
            Json(json!({ "account": AccountResponse::from(account) })),
        )
            .into_response(),
        Err(err) => ledger_error(&err),
    }
}
