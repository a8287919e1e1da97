//! Contra vouchers for reversing posted vouchers.
//!
//! Posted vouchers are never deleted or voided in place; the audit trail is
//! preserved by posting a new balanced voucher with debits and credits
//! swapped.

use chrono::NaiveDate;

use super::error::LedgerError;
use super::types::{CreateVoucherInput, EntryInput, Voucher, VoucherStatus, VoucherType};

/// Stateless service for building contra vouchers.
pub struct ContraService;

impl ContraService {
    /// Validate that a voucher can be reversed.
    ///
    /// # Errors
    ///
    /// Returns an error unless the voucher is posted.
    pub fn validate_reversible(voucher: &Voucher) -> Result<(), LedgerError> {
        if voucher.status != VoucherStatus::Posted {
            return Err(LedgerError::CanOnlyReversePosted);
        }
        Ok(())
    }

    /// Build the contra voucher input for a posted voucher.
    ///
    /// For each original entry:
    /// - Debits become credits and credits become debits
    /// - Target and amount are preserved
    /// - Line narrations are prefixed with `Reversal:`
    ///
    /// The original voucher stays posted; posting the returned input creates
    /// the offsetting record.
    #[must_use]
    pub fn build_contra_voucher(
        original: &Voucher,
        date: NaiveDate,
        reason: &str,
    ) -> CreateVoucherInput {
        let entries = original
            .entries
            .iter()
            .map(|entry| EntryInput {
                target: entry.target,
                side: entry.side.opposite(),
                amount: entry.amount,
                narration: Some(format!(
                    "Reversal: {}",
                    entry.narration.clone().unwrap_or_default()
                )),
            })
            .collect();

        CreateVoucherInput {
            voucher_type: VoucherType::Contra,
            date,
            narration: format!("Reversal of voucher {}. Reason: {}", original.number, reason),
            patient_id: original.patient_id,
            bill_ref: original.bill_ref.clone(),
            entries,
            correlation_key: None,
        }
    }
}
