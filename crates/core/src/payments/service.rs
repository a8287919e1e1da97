//! Payment allocation rules and voucher construction.

use rust_decimal::Decimal;

use charak_shared::types::{AccountId, BalanceSide};

use crate::ledger::{CreateVoucherInput, EntryInput, EntryTarget, VoucherType};
use crate::receivables::OutstandingInvoice;

use super::error::PaymentError;
use super::types::{PaymentStatus, PaymentTransaction};

/// Stateless service enforcing allocation rules.
pub struct PaymentService;

impl PaymentService {
    /// Validates an allocation against both the invoice and the payment.
    ///
    /// # Errors
    ///
    /// Returns `OverAllocation` when the amount exceeds either the invoice's
    /// remaining outstanding or the payment's unallocated remainder; other
    /// variants for bounced payments, patient mismatches and bad amounts.
    pub fn validate_allocation(
        payment: &PaymentTransaction,
        invoice: &OutstandingInvoice,
        amount: Decimal,
    ) -> Result<(), PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount);
        }
        if !payment.status.can_allocate() {
            return Err(PaymentError::PaymentBounced(payment.id));
        }
        if payment.patient_id != invoice.patient_id {
            return Err(PaymentError::PatientMismatch);
        }
        if amount > invoice.outstanding || amount > payment.unallocated {
            return Err(PaymentError::OverAllocation {
                requested: amount,
                invoice_outstanding: invoice.outstanding,
                payment_unallocated: payment.unallocated,
            });
        }
        Ok(())
    }

    /// Builds the receipt voucher an allocation posts.
    ///
    /// Debits the settlement account (cash or bank, chosen by mode) and
    /// credits the patient's receivable ledger, so the allocation flows
    /// through the same double-entry path as every other mutation.
    #[must_use]
    pub fn build_allocation_voucher(
        payment: &PaymentTransaction,
        invoice: &OutstandingInvoice,
        amount: Decimal,
        settlement_account: AccountId,
        receivable_account: AccountId,
    ) -> CreateVoucherInput {
        CreateVoucherInput {
            voucher_type: VoucherType::Receipt,
            date: payment.payment_date,
            narration: format!(
                "Payment {} allocated to invoice {}",
                payment.id, invoice.id
            ),
            patient_id: Some(payment.patient_id),
            bill_ref: invoice.bill_ref.clone(),
            entries: vec![
                EntryInput {
                    target: EntryTarget::Account(settlement_account),
                    side: BalanceSide::Debit,
                    amount,
                    narration: None,
                },
                EntryInput {
                    target: EntryTarget::Patient {
                        patient_id: payment.patient_id,
                        account_id: receivable_account,
                    },
                    side: BalanceSide::Credit,
                    amount,
                    narration: None,
                },
            ],
            correlation_key: None,
        }
    }

    /// Validates a manual payment status change.
    ///
    /// Only pending cheques change status: they clear or bounce.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusChange` for any other transition.
    pub fn validate_status_change(
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> Result<(), PaymentError> {
        match (from, to) {
            (PaymentStatus::Pending, PaymentStatus::Cleared | PaymentStatus::Bounced) => Ok(()),
            _ => Err(PaymentError::InvalidStatusChange { from, to }),
        }
    }
}
