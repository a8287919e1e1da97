//! Voucher repository: atomic posting, cancellation, reversal and queries.

use chrono::{NaiveDate, Utc};

use charak_core::ledger::{
    format_number, ContraService, CreateVoucherInput, EntryTarget, LedgerError, Voucher,
    VoucherService, VoucherStatus,
};
use charak_core::ledger::service::AccountStatus;
use charak_core::patient_ledger::{PatientLedger, PatientLedgerService};
use charak_shared::types::{PatientId, VoucherId};

use crate::mem::{MemStore, State};

/// Filter options for listing vouchers.
#[derive(Debug, Clone, Default)]
pub struct VoucherFilter {
    /// Date range start (inclusive).
    pub from: Option<NaiveDate>,
    /// Date range end (inclusive).
    pub to: Option<NaiveDate>,
    /// Filter by status.
    pub status: Option<VoucherStatus>,
    /// Filter by patient.
    pub patient_id: Option<PatientId>,
}

/// Repository for vouchers.
#[derive(Clone)]
pub struct VoucherRepository {
    store: MemStore,
}

impl VoucherRepository {
    /// Creates a new repository handle.
    #[must_use]
    pub const fn new(store: MemStore) -> Self {
        Self { store }
    }

    /// Validates, numbers and posts a voucher atomically.
    ///
    /// Everything happens under one write guard: either the voucher and all
    /// of its patient-ledger applications land, or nothing does.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` when validation fails; no state changes in
    /// that case.
    pub fn create(&self, input: CreateVoucherInput) -> Result<Voucher, LedgerError> {
        let mut state = self.store.write();
        post_voucher(&mut state, input)
    }

    /// Fetches a voucher by id.
    ///
    /// # Errors
    ///
    /// Returns `VoucherNotFound` if missing.
    pub fn get(&self, id: VoucherId) -> Result<Voucher, LedgerError> {
        self.store
            .read()
            .vouchers
            .get(&id)
            .cloned()
            .ok_or(LedgerError::VoucherNotFound(id))
    }

    /// Lists vouchers matching a filter, ordered by number.
    #[must_use]
    pub fn list(&self, filter: &VoucherFilter) -> Vec<Voucher> {
        let state = self.store.read();
        let mut vouchers: Vec<Voucher> = state
            .vouchers
            .values()
            .filter(|voucher| {
                filter.from.is_none_or(|from| voucher.date >= from)
                    && filter.to.is_none_or(|to| voucher.date <= to)
                    && filter.status.is_none_or(|status| voucher.status == status)
                    && filter
                        .patient_id
                        .is_none_or(|patient| voucher.patient_id == Some(patient))
            })
            .cloned()
            .collect();
        vouchers.sort_by(|a, b| a.number.cmp(&b.number));
        vouchers
    }

    /// Cancels a voucher. Only pending vouchers can be cancelled; posted
    /// vouchers are reversed with a contra voucher instead.
    ///
    /// # Errors
    ///
    /// Returns `CannotCancelPosted`/`AlreadyCancelled` per the state machine.
    pub fn cancel(&self, id: VoucherId) -> Result<Voucher, LedgerError> {
        let mut state = self.store.write();
        let voucher = state
            .vouchers
            .get_mut(&id)
            .ok_or(LedgerError::VoucherNotFound(id))?;
        VoucherService::validate_can_cancel(voucher.status)?;
        voucher.status = VoucherStatus::Cancelled;
        Ok(voucher.clone())
    }

    /// Reverses a posted voucher by posting a contra voucher.
    ///
    /// # Errors
    ///
    /// Returns `CanOnlyReversePosted` unless the original is posted, or any
    /// posting error for the contra voucher itself.
    pub fn reverse(
        &self,
        id: VoucherId,
        date: NaiveDate,
        reason: &str,
    ) -> Result<Voucher, LedgerError> {
        let mut state = self.store.write();
        let original = state
            .vouchers
            .get(&id)
            .ok_or(LedgerError::VoucherNotFound(id))?;
        ContraService::validate_reversible(original)?;
        let contra_input = ContraService::build_contra_voucher(original, date, reason);
        post_voucher(&mut state, contra_input)
    }
}

/// Posts a voucher inside an already-held write guard.
///
/// Shared by voucher creation, reversal and payment allocation so every
/// mutation path enforces the double-entry invariant identically.
pub(crate) fn post_voucher(
    state: &mut State,
    input: CreateVoucherInput,
) -> Result<Voucher, LedgerError> {
    let prepared = {
        let accounts = &state.accounts;
        VoucherService::prepare(&input, |id| {
            accounts
                .get(&id)
                .map(|account| AccountStatus {
                    id: account.id,
                    is_active: account.active,
                })
                .ok_or(LedgerError::AccountNotFound(id))
        })?
    };

    let sequence = state
        .voucher_counters
        .entry(input.voucher_type)
        .and_modify(|sequence| *sequence += 1)
        .or_insert(1);
    let number = format_number(input.voucher_type, *sequence);

    let mut voucher = Voucher {
        id: VoucherId::new(),
        number,
        date: input.date,
        voucher_type: input.voucher_type,
        narration: input.narration,
        patient_id: input.patient_id,
        bill_ref: input.bill_ref,
        total_amount: prepared.totals.debit,
        status: VoucherStatus::Pending,
        correlation_key: input.correlation_key,
        created_at: Utc::now(),
        entries: prepared.entries,
    };

    // Apply patient-ledger entries; accounts carry no materialized balance.
    for entry in &voucher.entries {
        if let EntryTarget::Patient {
            patient_id,
            account_id,
        } = entry.target
        {
            let ledger = find_or_create_patient_ledger(state, patient_id, account_id);
            PatientLedgerService::apply_entry(ledger, entry.side, entry.amount);
        }
    }

    voucher.status = VoucherStatus::Posted;
    state.vouchers.insert(voucher.id, voucher.clone());
    Ok(voucher)
}

/// Finds or lazily creates the ledger row for a (patient, account) pair.
pub(crate) fn find_or_create_patient_ledger(
    state: &mut State,
    patient_id: PatientId,
    account_id: charak_shared::types::AccountId,
) -> &mut PatientLedger {
    let existing = state
        .patient_ledgers
        .values()
        .find(|ledger| ledger.patient_id == patient_id && ledger.account_id == account_id)
        .map(|ledger| ledger.id);

    let id = existing.unwrap_or_else(|| {
        let ledger = PatientLedger::new(
            patient_id,
            account_id,
            rust_decimal::Decimal::ZERO,
            charak_shared::types::BalanceSide::Debit,
        );
        let id = ledger.id;
        state.patient_ledgers.insert(id, ledger);
        id
    });

    state
        .patient_ledgers
        .get_mut(&id)
        .expect("ledger row inserted above")
}
