//! Voucher service for pre-persistence validation and resolution.
//!
//! This service contains pure business logic with no storage dependencies.
//! Account lookups are injected so the stateful layer (and tests) decide
//! where account data comes from.

use charak_shared::types::{AccountId, VoucherEntryId};

use super::error::LedgerError;
use super::types::{CreateVoucherInput, VoucherEntry, VoucherStatus, VoucherTotals};
use super::validation::validate_entries;

/// Information about an account needed for validation.
#[derive(Debug, Clone)]
pub struct AccountStatus {
    /// The account ID.
    pub id: AccountId,
    /// Whether the account is active.
    pub is_active: bool,
}

/// A validated voucher ready for atomic persistence.
#[derive(Debug)]
pub struct PreparedVoucher {
    /// Voucher totals (balanced by construction).
    pub totals: VoucherTotals,
    /// Resolved entries with identifiers assigned.
    pub entries: Vec<VoucherEntry>,
}

/// Voucher service for validation and resolution.
pub struct VoucherService;

impl VoucherService {
    /// Validate a voucher and resolve its entries before persisting.
    ///
    /// Performs all validation steps:
    /// 1. Validates entries (non-empty, positive amounts, debits == credits)
    /// 2. Validates every targeted account (exists and is active)
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if validation fails; nothing is persisted in
    /// that case, so no partial voucher is ever observable.
    pub fn prepare<A>(
        input: &CreateVoucherInput,
        account_lookup: A,
    ) -> Result<PreparedVoucher, LedgerError>
    where
        A: Fn(AccountId) -> Result<AccountStatus, LedgerError>,
    {
        let totals = validate_entries(&input.entries)?;

        for entry in &input.entries {
            let status = account_lookup(entry.target.account_id())?;
            if !status.is_active {
                return Err(LedgerError::AccountInactive(status.id));
            }
        }

        let entries = input
            .entries
            .iter()
            .map(|entry| VoucherEntry {
                id: VoucherEntryId::new(),
                target: entry.target,
                side: entry.side,
                amount: entry.amount,
                narration: entry.narration.clone(),
            })
            .collect();

        Ok(PreparedVoucher { totals, entries })
    }

    /// Validate that a voucher can be cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error unless the voucher is still pending.
    pub fn validate_can_cancel(status: VoucherStatus) -> Result<(), LedgerError> {
        match status {
            VoucherStatus::Pending => Ok(()),
            VoucherStatus::Posted => Err(LedgerError::CannotCancelPosted),
            VoucherStatus::Cancelled => Err(LedgerError::AlreadyCancelled),
        }
    }
}
