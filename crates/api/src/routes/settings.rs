//! Ledger settings routes (settlement and receivable accounts).

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use charak_shared::types::AccountId;
use charak_store::LedgerSettings;
use charak_store::repositories::SettingsRepository;

use crate::AppState;

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings/ledger", get(get_settings))
        .route("/settings/ledger", put(update_settings))
}

/// Request/response body for the ledger settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerSettingsBody {
    /// Control account patient receivable ledgers sit under.
    pub receivable_account_id: Option<Uuid>,
    /// Settlement account for cash payments.
    pub cash_account_id: Option<Uuid>,
    /// Settlement account for card/UPI/cheque/transfer payments.
    pub bank_account_id: Option<Uuid>,
}

impl From<LedgerSettings> for LedgerSettingsBody {
    fn from(settings: LedgerSettings) -> Self {
        Self {
            receivable_account_id: settings.receivable_account_id.map(AccountId::into_inner),
            cash_account_id: settings.cash_account_id.map(AccountId::into_inner),
            bank_account_id: settings.bank_account_id.map(AccountId::into_inner),
        }
    }
}

/// GET `/settings/ledger` - Current settings.
async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let settings = SettingsRepository::new(state.store).get();
    (
        StatusCode::OK,
        Json(json!({ "settings": LedgerSettingsBody::from(settings) })),
    )
        .into_response()
}

/// PUT `/settings/ledger` - Replace the settings.
async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<LedgerSettingsBody>,
) -> impl IntoResponse {
    let settings = SettingsRepository::new(state.store).update(
        body.receivable_account_id.map(AccountId::from_uuid),
        body.cash_account_id.map(AccountId::from_uuid),
        body.bank_account_id.map(AccountId::from_uuid),
    );
    (
        StatusCode::OK,
        Json(json!({ "settings": LedgerSettingsBody::from(settings) })),
    )
        .into_response()
}
