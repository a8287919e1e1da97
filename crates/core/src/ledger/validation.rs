//! Business rule validation for voucher entries.

use rust_decimal::Decimal;

use charak_shared::types::BalanceSide;

use super::error::LedgerError;
use super::types::{EntryInput, VoucherTotals};

/// Validates a set of voucher entries against the double-entry invariant.
///
/// Returns the computed totals on success.
///
/// # Errors
///
/// Returns an error if the entries are empty, carry non-positive amounts, or
/// do not balance.
pub fn validate_entries(entries: &[EntryInput]) -> Result<VoucherTotals, LedgerError> {
    if entries.is_empty() {
        return Err(LedgerError::EmptyVoucher);
    }

    let mut debit = Decimal::ZERO;
    let mut credit = Decimal::ZERO;

    for entry in entries {
        if entry.amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if entry.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        match entry.side {
            BalanceSide::Debit => debit += entry.amount,
            BalanceSide::Credit => credit += entry.amount,
        }
    }

    let totals = VoucherTotals::new(debit, credit);
    if !totals.is_balanced {
        return Err(LedgerError::UnbalancedVoucher { debit, credit });
    }

    Ok(totals)
}
