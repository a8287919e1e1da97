//! Export builders: pure transforms of internal state into external documents.

use charak_shared::types::AccountId;

use crate::accounts::Account;
use crate::ledger::{Voucher, VoucherStatus};

use super::document::{
    EntryRecord, ExternalDocument, LedgerDocument, LedgerRecord, MasterDocument, VoucherDocument,
    VoucherRecord,
};

/// Which slice of internal state to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Chart of accounts only.
    Ledgers,
    /// Vouchers only.
    Vouchers,
    /// Both.
    Full,
}

impl ExportKind {
    /// Returns the kind name used in file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ledgers => "ledgers",
            Self::Vouchers => "vouchers",
            Self::Full => "full",
        }
    }
}

impl std::str::FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ledgers" => Ok(Self::Ledgers),
            "vouchers" => Ok(Self::Vouchers),
            "full" => Ok(Self::Full),
            _ => Err(format!("Unknown export kind: {s}")),
        }
    }
}

/// Stateless export document builder.
pub struct ExportService;

impl ExportService {
    /// Builds a ledger document from the chart of accounts.
    #[must_use]
    pub fn ledger_document(accounts: &[Account], company: &str) -> LedgerDocument {
        LedgerDocument {
            company: (!company.is_empty()).then(|| company.to_string()),
            records: accounts.iter().map(Self::ledger_record).collect(),
        }
    }

    /// Builds a voucher document from posted vouchers.
    ///
    /// Only posted vouchers leave the system; pending and cancelled vouchers
    /// are internal bookkeeping states. Entry targets are resolved to ledger
    /// names through `ledger_name`, falling back to the raw account id.
    #[must_use]
    pub fn voucher_document<F>(vouchers: &[Voucher], ledger_name: F) -> VoucherDocument
    where
        F: Fn(AccountId) -> Option<String>,
    {
        VoucherDocument {
            records: vouchers
                .iter()
                .filter(|voucher| voucher.status == VoucherStatus::Posted)
                .map(|voucher| Self::voucher_record(voucher, &ledger_name))
                .collect(),
        }
    }

    /// Builds the document for an export kind.
    #[must_use]
    pub fn document<F>(
        kind: ExportKind,
        accounts: &[Account],
        vouchers: &[Voucher],
        company: &str,
        ledger_name: F,
    ) -> ExternalDocument
    where
        F: Fn(AccountId) -> Option<String>,
    {
        match kind {
            ExportKind::Ledgers => {
                ExternalDocument::Ledgers(Self::ledger_document(accounts, company))
            }
            ExportKind::Vouchers => {
                ExternalDocument::Vouchers(Self::voucher_document(vouchers, ledger_name))
            }
            ExportKind::Full => ExternalDocument::Master(MasterDocument {
                ledgers: Self::ledger_document(accounts, company).records,
                vouchers: Self::voucher_document(vouchers, ledger_name).records,
            }),
        }
    }

    fn ledger_record(account: &Account) -> LedgerRecord {
        LedgerRecord {
            name: account.name.clone(),
            code: Some(account.code.clone()),
            key: account.correlation_key.clone(),
            account_type: Some(account.account_type.to_string()),
            opening_balance: Some(account.opening_balance),
            opening_side: Some(account.opening_side.to_string()),
            active: account.active,
            extra: std::collections::BTreeMap::new(),
        }
    }

    fn voucher_record<F>(voucher: &Voucher, ledger_name: &F) -> VoucherRecord
    where
        F: Fn(AccountId) -> Option<String>,
    {
        VoucherRecord {
            key: voucher.correlation_key.clone(),
            number: Some(voucher.number.clone()),
            date: voucher.date,
            voucher_type: Some(
                match voucher.voucher_type {
                    crate::ledger::VoucherType::Journal => "journal",
                    crate::ledger::VoucherType::Receipt => "receipt",
                    crate::ledger::VoucherType::Payment => "payment",
                    crate::ledger::VoucherType::Contra => "contra",
                }
                .to_string(),
            ),
            narration: Some(voucher.narration.clone()),
            entries: voucher
                .entries
                .iter()
                .map(|entry| {
                    let account_id = entry.target.account_id();
                    EntryRecord {
                        ledger: ledger_name(account_id)
                            .unwrap_or_else(|| account_id.to_string()),
                        debit: entry.debit(),
                        credit: entry.credit(),
                        narration: entry.narration.clone(),
                        extra: std::collections::BTreeMap::new(),
                    }
                })
                .collect(),
            extra: std::collections::BTreeMap::new(),
        }
    }
}
