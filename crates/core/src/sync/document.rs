//! External document model.
//!
//! The external system exchanges loosely-typed record trees. They are parsed
//! into the strongly-typed records below at the boundary; fields we do not
//! know are preserved in an `extra` map so round-tripping loses nothing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document received from or sent to the external system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExternalDocument {
    /// Chart of accounts (the external system calls them ledgers).
    Ledgers(LedgerDocument),
    /// Vouchers.
    Vouchers(VoucherDocument),
    /// Both in one document.
    Master(MasterDocument),
}

impl ExternalDocument {
    /// Returns the document kind name.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Ledgers(_) => "ledgers",
            Self::Vouchers(_) => "vouchers",
            Self::Master(_) => "master",
        }
    }
}

/// A document of ledger (account) records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerDocument {
    /// Company the records belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// The records.
    #[serde(default)]
    pub records: Vec<LedgerRecord>,
}

/// One ledger (account) record in external form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Ledger name.
    pub name: String,
    /// Ledger code, if the external system tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Stable external identifier (the correlation key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Account classification as the external system labels it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    /// Opening balance amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_balance: Option<Decimal>,
    /// Side the opening balance sits on (`debit`/`credit`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_side: Option<String>,
    /// Whether the ledger is active.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Fields we do not model, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_true() -> bool {
    true
}

impl LedgerRecord {
    /// Best identifier for failure reporting: correlation key, else name.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.key.clone().unwrap_or_else(|| self.name.clone())
    }
}

/// A document of voucher records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoucherDocument {
    /// The records.
    #[serde(default)]
    pub records: Vec<VoucherRecord>,
}

/// One voucher record in external form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherRecord {
    /// Stable external identifier (the correlation key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Voucher number in the external system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Voucher date.
    pub date: NaiveDate,
    /// Voucher type label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_type: Option<String>,
    /// Narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    /// The entries.
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
    /// Fields we do not model, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VoucherRecord {
    /// Best identifier for failure reporting and dedup: key, else number.
    #[must_use]
    pub fn identifier(&self) -> Option<String> {
        self.key.clone().or_else(|| self.number.clone())
    }
}

/// One voucher entry in external two-column form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Name or code of the ledger the entry posts against.
    pub ledger: String,
    /// Debit amount (zero for credit entries).
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount (zero for debit entries).
    #[serde(default)]
    pub credit: Decimal,
    /// Line narration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    /// Fields we do not model, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Ledgers and vouchers in one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterDocument {
    /// Ledger records.
    #[serde(default)]
    pub ledgers: Vec<LedgerRecord>,
    /// Voucher records.
    #[serde(default)]
    pub vouchers: Vec<VoucherRecord>,
}
