//! Patient ledger repository.

use charak_core::ledger::{EntryTarget, LedgerError, VoucherStatus};
use charak_core::patient_ledger::{LedgerEvent, PatientLedger, PatientLedgerService};
use charak_shared::types::{AccountId, BalanceSide, PatientId, PatientLedgerId};
use rust_decimal::Decimal;

use crate::mem::MemStore;

/// Result of a balance repair.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    /// The ledger after recomputation.
    pub ledger: PatientLedger,
    /// Whether the materialized balance had drifted.
    pub changed: bool,
}

/// Repository for per-patient ledgers.
#[derive(Clone)]
pub struct PatientLedgerRepository {
    store: MemStore,
}

impl PatientLedgerRepository {
    /// Creates a new repository handle.
    #[must_use]
    pub const fn new(store: MemStore) -> Self {
        Self { store }
    }

    /// Explicitly creates a ledger row with an opening balance.
    ///
    /// Voucher posting creates rows lazily with a zero opening; this is the
    /// mutation surface for registering a patient with a brought-forward
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing/inactive or the pair
    /// already has a ledger.
    pub fn create(
        &self,
        patient_id: PatientId,
        account_id: AccountId,
        opening_balance: Decimal,
        opening_side: BalanceSide,
    ) -> Result<PatientLedger, LedgerError> {
        let mut state = self.store.write();

        let account = state
            .accounts
            .get(&account_id)
            .ok_or(LedgerError::AccountNotFound(account_id))?;
        if !account.active {
            return Err(LedgerError::AccountInactive(account_id));
        }
        if state
            .patient_ledgers
            .values()
            .any(|ledger| ledger.patient_id == patient_id && ledger.account_id == account_id)
        {
            return Err(LedgerError::PatientLedgerExists {
                patient_id,
                account_id,
            });
        }

        let ledger = PatientLedger::new(patient_id, account_id, opening_balance, opening_side);
        state.patient_ledgers.insert(ledger.id, ledger.clone());
        Ok(ledger)
    }

    /// Fetches a ledger by id.
    ///
    /// # Errors
    ///
    /// Returns `PatientLedgerNotFound` if missing.
    pub fn get(&self, id: PatientLedgerId) -> Result<PatientLedger, LedgerError> {
        self.store
            .read()
            .patient_ledgers
            .get(&id)
            .cloned()
            .ok_or(LedgerError::PatientLedgerNotFound(id))
    }

    /// Lists ledgers, optionally for one patient.
    #[must_use]
    pub fn list(&self, patient_id: Option<PatientId>) -> Vec<PatientLedger> {
        let state = self.store.read();
        let mut ledgers: Vec<PatientLedger> = state
            .patient_ledgers
            .values()
            .filter(|ledger| patient_id.is_none_or(|patient| ledger.patient_id == patient))
            .cloned()
            .collect();
        ledgers.sort_by_key(|ledger| (ledger.patient_id, ledger.account_id));
        ledgers
    }

    /// Recomputes a ledger's balance by replaying its posted entry history
    /// in voucher-number order.
    ///
    /// The materialized balance is a cache; this is the repair routine that
    /// re-derives it from the source of truth.
    ///
    /// # Errors
    ///
    /// Returns `PatientLedgerNotFound` if missing.
    pub fn recompute(&self, id: PatientLedgerId) -> Result<RepairOutcome, LedgerError> {
        let mut state = self.store.write();

        let (patient_id, account_id) = {
            let ledger = state
                .patient_ledgers
                .get(&id)
                .ok_or(LedgerError::PatientLedgerNotFound(id))?;
            (ledger.patient_id, ledger.account_id)
        };

        let events: Vec<LedgerEvent> = state
            .vouchers
            .values()
            .filter(|voucher| voucher.status == VoucherStatus::Posted)
            .flat_map(|voucher| {
                voucher.entries.iter().filter_map(|entry| match entry.target {
                    EntryTarget::Patient {
                        patient_id: entry_patient,
                        account_id: entry_account,
                    } if entry_patient == patient_id && entry_account == account_id => {
                        Some(LedgerEvent {
                            voucher_number: voucher.number.clone(),
                            side: entry.side,
                            amount: entry.amount,
                        })
                    }
                    _ => None,
                })
            })
            .collect();

        let ledger = state
            .patient_ledgers
            .get_mut(&id)
            .ok_or(LedgerError::PatientLedgerNotFound(id))?;
        let changed = PatientLedgerService::repair(ledger, events);
        Ok(RepairOutcome {
            ledger: ledger.clone(),
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charak_core::accounts::{AccountType, NewAccount};
    use charak_core::ledger::{CreateVoucherInput, EntryInput, VoucherType};
    use charak_core::sync::ExternalSyncConfig;
    use charak_shared::config::ExternalConfig;
    use charak_shared::types::SignedBalance;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::repositories::{AccountRepository, VoucherRepository};

    fn make_store() -> MemStore {
        MemStore::new(ExternalSyncConfig::from_defaults(&ExternalConfig {
            host: "localhost".to_string(),
            port: 9000,
            company: String::new(),
            sync_enabled: false,
            sync_frequency: "manual".to_string(),
            update_existing: false,
        }))
    }

    fn make_account(store: &MemStore, code: &str, name: &str) -> AccountId {
        AccountRepository::new(store.clone())
            .create(NewAccount {
                code: code.to_string(),
                name: name.to_string(),
                account_type: AccountType::Asset,
                opening_balance: Decimal::ZERO,
                opening_side: BalanceSide::Debit,
                correlation_key: None,
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_create_rejects_duplicates() {
        let store = make_store();
        let account = make_account(&store, "1200", "Patient Receivables");
        let repo = PatientLedgerRepository::new(store);
        let patient = PatientId::new();

        repo.create(patient, account, Decimal::ZERO, BalanceSide::Debit)
            .unwrap();
        assert!(matches!(
            repo.create(patient, account, Decimal::ZERO, BalanceSide::Debit),
            Err(LedgerError::PatientLedgerExists { .. })
        ));
    }

    #[test]
    fn test_create_requires_active_account() {
        let store = make_store();
        let account = make_account(&store, "1200", "Patient Receivables");
        AccountRepository::new(store.clone())
            .deactivate(account)
            .unwrap();

        let repo = PatientLedgerRepository::new(store);
        assert!(matches!(
            repo.create(PatientId::new(), account, Decimal::ZERO, BalanceSide::Debit),
            Err(LedgerError::AccountInactive(_))
        ));
    }

    #[test]
    fn test_recompute_repairs_drifted_cache() {
        let store = make_store();
        let receivable = make_account(&store, "1200", "Patient Receivables");
        let income = make_account(&store, "4000", "Consultation Income");
        let patient = PatientId::new();

        let ledger = PatientLedgerRepository::new(store.clone())
            .create(patient, receivable, Decimal::ZERO, BalanceSide::Debit)
            .unwrap();

        VoucherRepository::new(store.clone())
            .create(CreateVoucherInput {
                voucher_type: VoucherType::Journal,
                date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                narration: "Charge".to_string(),
                patient_id: Some(patient),
                bill_ref: None,
                entries: vec![
                    EntryInput {
                        target: charak_core::ledger::EntryTarget::Patient {
                            patient_id: patient,
                            account_id: receivable,
                        },
                        side: BalanceSide::Debit,
                        amount: dec!(500),
                        narration: None,
                    },
                    EntryInput {
                        target: charak_core::ledger::EntryTarget::Account(income),
                        side: BalanceSide::Credit,
                        amount: dec!(500),
                        narration: None,
                    },
                ],
                correlation_key: None,
            })
            .unwrap();

        // Corrupt the cache, then repair.
        {
            let mut state = store.write();
            let row = state.patient_ledgers.get_mut(&ledger.id).unwrap();
            row.balance = SignedBalance::from_side(dec!(9999), BalanceSide::Credit);
        }

        let repo = PatientLedgerRepository::new(store);
        let outcome = repo.recompute(ledger.id).unwrap();
        assert!(outcome.changed);
        assert_eq!(
            outcome.ledger.display_balance(),
            (dec!(500), BalanceSide::Debit)
        );

        // Second pass is a no-op.
        assert!(!repo.recompute(ledger.id).unwrap().changed);
    }
}
