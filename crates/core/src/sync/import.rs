//! Import planning with correlation-key identity resolution.
//!
//! Import is idempotent: records are matched by correlation key first, then
//! by name; only genuinely new records insert, with a deterministic code
//! derived from a stable hash of the name so re-runs regenerate the same
//! code instead of drifting. Per-record problems become `RecordFailure`
//! values and never abort the run.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};

use charak_shared::types::{AccountId, BalanceSide};

use crate::accounts::AccountType;
use crate::ledger::{CreateVoucherInput, EntryInput, EntryTarget, VoucherType};

use super::document::{LedgerRecord, VoucherRecord};

/// A single failed record within an otherwise successful run.
#[derive(Debug, Clone, Serialize)]
pub struct RecordFailure {
    /// Index of the record within its document.
    pub record_index: usize,
    /// Best available identifier (key, name or number).
    pub identifier: String,
    /// Stable error code.
    pub error_code: String,
    /// Human-readable message.
    pub message: String,
}

impl RecordFailure {
    fn new(record_index: usize, identifier: String, error_code: &str, message: String) -> Self {
        Self {
            record_index,
            identifier,
            error_code: error_code.to_string(),
            message,
        }
    }
}

/// What an imported ledger record resolves to.
#[derive(Debug, Clone)]
pub struct AccountSpec {
    /// Account code (from the record, or generated).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Opening balance amount.
    pub opening_balance: Decimal,
    /// Side the opening balance sits on.
    pub opening_side: BalanceSide,
    /// Whether the account is active.
    pub active: bool,
    /// External correlation key.
    pub correlation_key: Option<String>,
}

/// Planned action for one ledger record.
#[derive(Debug, Clone)]
pub enum LedgerAction {
    /// Brand-new record: insert.
    Insert(AccountSpec),
    /// Matched and `update_existing` is on: overwrite imported fields.
    Update {
        /// The matched internal account.
        id: AccountId,
        /// The new field values.
        spec: AccountSpec,
    },
    /// Matched by name with a new correlation key: attach the key only.
    Attach {
        /// The matched internal account.
        id: AccountId,
        /// The key to attach.
        correlation_key: String,
    },
    /// Matched and `update_existing` is off: nothing to do.
    Skip {
        /// The matched internal account.
        id: AccountId,
    },
}

/// Result of planning a ledger import.
#[derive(Debug, Default)]
pub struct LedgerImportPlan {
    /// Actions in record order (failed records produce no action).
    pub actions: Vec<LedgerAction>,
    /// Per-record failures.
    pub failures: Vec<RecordFailure>,
}

/// Minimal view of an existing account for identity resolution.
#[derive(Debug, Clone)]
pub struct ExistingAccount {
    /// Internal id.
    pub id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Correlation key, if already matched.
    pub correlation_key: Option<String>,
}

/// Planned action for one voucher record.
#[derive(Debug)]
pub enum VoucherAction {
    /// Brand-new voucher: post through the normal create path.
    Insert(CreateVoucherInput),
    /// Already imported (correlation key seen): nothing to do.
    Skip {
        /// The identifier that matched.
        identifier: String,
    },
}

/// Result of planning a voucher import.
#[derive(Debug, Default)]
pub struct VoucherImportPlan {
    /// Actions in record order (failed records produce no action).
    pub actions: Vec<VoucherAction>,
    /// Per-record failures.
    pub failures: Vec<RecordFailure>,
}

/// Stateless import planner.
pub struct ImportService;

impl ImportService {
    /// Derives a deterministic account code from a ledger name.
    ///
    /// Stable across runs: the same name always yields the same code, so a
    /// re-import that races a previous partial import still converges.
    #[must_use]
    pub fn generated_code(name: &str) -> String {
        let digest = Sha256::digest(name.trim().to_lowercase().as_bytes());
        format!(
            "IMP-{:02X}{:02X}{:02X}{:02X}",
            digest[0], digest[1], digest[2], digest[3]
        )
    }

    /// Plans a ledger (account) import.
    ///
    /// Resolution order per record: correlation key, then case-insensitive
    /// name. Unmatched records insert; matched records update, attach a key,
    /// or skip depending on `update_existing` and whether the record carries
    /// a key the internal account lacks.
    #[must_use]
    pub fn plan_ledgers(
        records: &[LedgerRecord],
        existing: &[ExistingAccount],
        update_existing: bool,
    ) -> LedgerImportPlan {
        let by_key: HashMap<&str, &ExistingAccount> = existing
            .iter()
            .filter_map(|account| {
                account
                    .correlation_key
                    .as_deref()
                    .map(|key| (key, account))
            })
            .collect();
        let by_name: HashMap<String, &ExistingAccount> = existing
            .iter()
            .map(|account| (account.name.trim().to_lowercase(), account))
            .collect();

        let mut plan = LedgerImportPlan::default();
        let mut seen_in_document: HashSet<String> = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            let name = record.name.trim();
            if name.is_empty() {
                plan.failures.push(RecordFailure::new(
                    index,
                    record.identifier(),
                    "EMPTY_NAME",
                    "Ledger record has no name".to_string(),
                ));
                continue;
            }

            if !seen_in_document.insert(name.to_lowercase()) {
                plan.failures.push(RecordFailure::new(
                    index,
                    record.identifier(),
                    "DUPLICATE_RECORD",
                    format!("Ledger {name} appears more than once in the document"),
                ));
                continue;
            }

            let spec = match Self::account_spec(record) {
                Ok(spec) => spec,
                Err((code, message)) => {
                    plan.failures.push(RecordFailure::new(
                        index,
                        record.identifier(),
                        code,
                        message,
                    ));
                    continue;
                }
            };

            let matched = record
                .key
                .as_deref()
                .and_then(|key| by_key.get(key).copied())
                .or_else(|| by_name.get(&name.to_lowercase()).copied());

            match matched {
                Some(account) if update_existing => plan.actions.push(LedgerAction::Update {
                    id: account.id,
                    spec: AccountSpec {
                        // Matched accounts keep their code; codes are identity.
                        code: account.code.clone(),
                        ..spec
                    },
                }),
                Some(account) => {
                    // Attach a newly learned correlation key even when not
                    // overwriting fields; matching is what makes re-imports
                    // idempotent.
                    match record.key.as_deref() {
                        Some(key) if account.correlation_key.is_none() => {
                            plan.actions.push(LedgerAction::Attach {
                                id: account.id,
                                correlation_key: key.to_string(),
                            });
                        }
                        _ => plan.actions.push(LedgerAction::Skip { id: account.id }),
                    }
                }
                None => plan.actions.push(LedgerAction::Insert(spec)),
            }
        }

        plan
    }

    /// Plans a voucher import.
    ///
    /// Vouchers are immutable once posted, so matched records always skip
    /// regardless of `update_existing`. Ledger references resolve through
    /// `resolve_ledger` (by name or code) against the already-imported
    /// account set; this is why ledgers import strictly before vouchers.
    #[must_use]
    pub fn plan_vouchers<R>(
        records: &[VoucherRecord],
        existing_keys: &HashSet<String>,
        resolve_ledger: R,
    ) -> VoucherImportPlan
    where
        R: Fn(&str) -> Option<AccountId>,
    {
        let mut plan = VoucherImportPlan::default();

        for (index, record) in records.iter().enumerate() {
            let identifier = record
                .identifier()
                .unwrap_or_else(|| format!("record-{index}"));

            if record.identifier().is_some_and(|id| existing_keys.contains(&id)) {
                plan.actions.push(VoucherAction::Skip { identifier });
                continue;
            }

            if record.entries.is_empty() {
                plan.failures.push(RecordFailure::new(
                    index,
                    identifier,
                    "EMPTY_VOUCHER",
                    "Voucher record has no entries".to_string(),
                ));
                continue;
            }

            match Self::voucher_input(record, &resolve_ledger) {
                Ok(input) => plan.actions.push(VoucherAction::Insert(input)),
                Err((code, message)) => {
                    plan.failures
                        .push(RecordFailure::new(index, identifier, code, message));
                }
            }
        }

        plan
    }

    fn account_spec(record: &LedgerRecord) -> Result<AccountSpec, (&'static str, String)> {
        let account_type = match record.account_type.as_deref() {
            None => AccountType::Asset,
            Some(raw) => raw
                .parse::<AccountType>()
                .map_err(|message| ("UNKNOWN_ACCOUNT_TYPE", message))?,
        };

        let opening_side = match record.opening_side.as_deref() {
            None => BalanceSide::Debit,
            Some(raw) => raw
                .parse::<BalanceSide>()
                .map_err(|message| ("INVALID_SIDE", message))?,
        };

        Ok(AccountSpec {
            code: record
                .code
                .clone()
                .unwrap_or_else(|| Self::generated_code(&record.name)),
            name: record.name.trim().to_string(),
            account_type,
            opening_balance: record.opening_balance.unwrap_or_default(),
            opening_side,
            active: record.active,
            correlation_key: record.key.clone(),
        })
    }

    fn voucher_input<R>(
        record: &VoucherRecord,
        resolve_ledger: &R,
    ) -> Result<CreateVoucherInput, (&'static str, String)>
    where
        R: Fn(&str) -> Option<AccountId>,
    {
        let mut debit_total = Decimal::ZERO;
        let mut credit_total = Decimal::ZERO;
        let mut entries = Vec::with_capacity(record.entries.len());

        for entry in &record.entries {
            let (side, amount) = match (entry.debit.is_zero(), entry.credit.is_zero()) {
                (false, true) => (BalanceSide::Debit, entry.debit),
                (true, false) => (BalanceSide::Credit, entry.credit),
                (true, true) => {
                    return Err((
                        "ZERO_ENTRY",
                        format!("Entry against {} has neither debit nor credit", entry.ledger),
                    ));
                }
                (false, false) => {
                    return Err((
                        "AMBIGUOUS_ENTRY",
                        format!("Entry against {} has both debit and credit", entry.ledger),
                    ));
                }
            };

            let Some(account_id) = resolve_ledger(&entry.ledger) else {
                return Err((
                    "UNKNOWN_LEDGER",
                    format!("Ledger {} is not in the chart of accounts", entry.ledger),
                ));
            };

            match side {
                BalanceSide::Debit => debit_total += amount,
                BalanceSide::Credit => credit_total += amount,
            }

            entries.push(EntryInput {
                target: EntryTarget::Account(account_id),
                side,
                amount,
                narration: entry.narration.clone(),
            });
        }

        if debit_total != credit_total {
            return Err((
                "UNBALANCED",
                format!(
                    "Voucher debits {debit_total} and credits {credit_total} do not balance"
                ),
            ));
        }

        let voucher_type = record
            .voucher_type
            .as_deref()
            .and_then(|raw| raw.parse::<VoucherType>().ok())
            .unwrap_or(VoucherType::Journal);

        Ok(CreateVoucherInput {
            voucher_type,
            date: record.date,
            narration: record
                .narration
                .clone()
                .unwrap_or_else(|| "Imported voucher".to_string()),
            patient_id: None,
            bill_ref: None,
            entries,
            correlation_key: record.identifier(),
        })
    }
}
