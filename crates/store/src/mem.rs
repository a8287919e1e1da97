//! The shared in-memory store.
//!
//! All tables live behind one `RwLock`, so a write guard is the unit of
//! atomicity: voucher posting takes one guard and either applies every
//! entry or none, exactly like a database transaction would.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use charak_core::accounts::Account;
use charak_core::ledger::{Voucher, VoucherType};
use charak_core::patient_ledger::PatientLedger;
use charak_core::payments::{PaymentAllocation, PaymentMode, PaymentTransaction};
use charak_core::receivables::{AgingSnapshot, OutstandingInvoice};
use charak_core::sync::{ExternalSyncConfig, ExternalSyncRun};
use charak_shared::types::{
    AccountId, InvoiceId, PatientLedgerId, PaymentId, VoucherId,
};

/// Accounts the payment service settles against.
#[derive(Debug, Clone, Default)]
pub struct LedgerSettings {
    /// Control account patient receivable ledgers sit under.
    pub receivable_account_id: Option<AccountId>,
    /// Settlement account for cash payments.
    pub cash_account_id: Option<AccountId>,
    /// Settlement account for card/UPI/cheque/transfer payments.
    pub bank_account_id: Option<AccountId>,
}

impl LedgerSettings {
    /// Returns the settlement account for a payment mode.
    #[must_use]
    pub fn settlement_for(&self, mode: PaymentMode) -> Option<AccountId> {
        match mode {
            PaymentMode::Cash => self.cash_account_id,
            PaymentMode::Card
            | PaymentMode::Upi
            | PaymentMode::Cheque
            | PaymentMode::BankTransfer => self.bank_account_id,
        }
    }
}

/// All tables of the store.
pub(crate) struct State {
    pub accounts: HashMap<AccountId, Account>,
    pub patient_ledgers: HashMap<PatientLedgerId, PatientLedger>,
    pub vouchers: HashMap<VoucherId, Voucher>,
    pub voucher_counters: HashMap<VoucherType, u64>,
    pub invoices: HashMap<InvoiceId, OutstandingInvoice>,
    pub payments: HashMap<PaymentId, PaymentTransaction>,
    pub allocations: Vec<PaymentAllocation>,
    pub snapshots: Vec<AgingSnapshot>,
    pub sync_config: ExternalSyncConfig,
    pub sync_runs: Vec<ExternalSyncRun>,
    pub settings: LedgerSettings,
}

/// Cloneable handle to the shared store.
#[derive(Clone)]
pub struct MemStore {
    inner: Arc<RwLock<State>>,
}

impl MemStore {
    /// Creates an empty store seeded with a sync configuration row.
    #[must_use]
    pub fn new(sync_config: ExternalSyncConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(State {
                accounts: HashMap::new(),
                patient_ledgers: HashMap::new(),
                vouchers: HashMap::new(),
                voucher_counters: HashMap::new(),
                invoices: HashMap::new(),
                payments: HashMap::new(),
                allocations: Vec::new(),
                snapshots: Vec::new(),
                sync_config,
                sync_runs: Vec::new(),
                settings: LedgerSettings::default(),
            })),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves a ledger reference (correlation key, name or code) to an
    /// account id.
    #[must_use]
    pub fn resolve_ledger(&self, reference: &str) -> Option<AccountId> {
        self.read().resolve_ledger_ref(reference)
    }
}

impl State {
    /// Resolves a ledger reference (correlation key, name or code) to an
    /// account. Names match case-insensitively.
    pub(crate) fn resolve_ledger_ref(&self, reference: &str) -> Option<AccountId> {
        let wanted = reference.trim().to_lowercase();
        self.accounts
            .values()
            .find(|account| {
                account.correlation_key.as_deref() == Some(reference)
                    || account.name.to_lowercase() == wanted
                    || account.code.to_lowercase() == wanted
            })
            .map(|account| account.id)
    }
}
