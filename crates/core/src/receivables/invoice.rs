//! Outstanding invoice domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use charak_shared::types::{InvoiceId, PatientId};

use crate::ledger::LedgerError;

use super::aging::AgingBucket;

/// An invoice carrying an outstanding balance.
///
/// `outstanding` always satisfies `0 <= outstanding <= invoice_amount` and
/// equals `invoice_amount - sum(allocations)`. Fully paid invoices stay on
/// record for history but drop out of aging snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutstandingInvoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// The patient billed.
    pub patient_id: PatientId,
    /// Date the invoice was raised.
    pub invoice_date: NaiveDate,
    /// Date payment falls due.
    pub due_date: NaiveDate,
    /// Original invoice amount.
    pub invoice_amount: Decimal,
    /// Amount still unpaid.
    pub outstanding: Decimal,
    /// Bill reference from the billing screens, if any.
    pub bill_ref: Option<String>,
}

/// Input for recording a new outstanding invoice.
#[derive(Debug, Clone)]
pub struct RecordInvoiceInput {
    /// The patient billed.
    pub patient_id: PatientId,
    /// Date the invoice was raised.
    pub invoice_date: NaiveDate,
    /// Date payment falls due.
    pub due_date: NaiveDate,
    /// Invoice amount (must be positive).
    pub amount: Decimal,
    /// Bill reference, if any.
    pub bill_ref: Option<String>,
}

impl OutstandingInvoice {
    /// Records a new invoice with the full amount outstanding.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or negative.
    pub fn record(input: RecordInvoiceInput) -> Result<Self, LedgerError> {
        if input.amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if input.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        Ok(Self {
            id: InvoiceId::new(),
            patient_id: input.patient_id,
            invoice_date: input.invoice_date,
            due_date: input.due_date,
            invoice_amount: input.amount,
            outstanding: input.amount,
            bill_ref: input.bill_ref,
        })
    }

    /// Returns true once the invoice is fully paid.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.outstanding.is_zero()
    }

    /// Returns the remaining outstanding amount.
    #[must_use]
    pub const fn remaining(&self) -> Decimal {
        self.outstanding
    }

    /// Classifies this invoice as of a reporting date.
    #[must_use]
    pub fn bucket(&self, as_of: NaiveDate) -> AgingBucket {
        AgingBucket::bucket_for(self.due_date, as_of)
    }

    /// Reduces the outstanding amount by an allocation.
    ///
    /// Callers must validate the amount first (see
    /// `payments::PaymentService::validate_allocation`); the subtraction is
    /// never allowed to cross zero.
    pub fn apply_allocation(&mut self, amount: Decimal) {
        debug_assert!(amount <= self.outstanding);
        self.outstanding -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn make_input(amount: Decimal) -> RecordInvoiceInput {
        RecordInvoiceInput {
            patient_id: PatientId::new(),
            invoice_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            amount,
            bill_ref: None,
        }
    }

    #[test]
    fn test_record_starts_fully_outstanding() {
        let invoice = OutstandingInvoice::record(make_input(dec!(500))).unwrap();
        assert_eq!(invoice.invoice_amount, dec!(500));
        assert_eq!(invoice.outstanding, dec!(500));
        assert!(!invoice.is_settled());
    }

    #[test]
    fn test_record_rejects_non_positive_amounts() {
        assert!(matches!(
            OutstandingInvoice::record(make_input(dec!(0))),
            Err(LedgerError::ZeroAmount)
        ));
        assert!(matches!(
            OutstandingInvoice::record(make_input(dec!(-10))),
            Err(LedgerError::NegativeAmount)
        ));
    }

    #[test]
    fn test_allocations_settle_invoice() {
        let mut invoice = OutstandingInvoice::record(make_input(dec!(500))).unwrap();
        invoice.apply_allocation(dec!(200));
        assert_eq!(invoice.remaining(), dec!(300));

        invoice.apply_allocation(dec!(300));
        assert!(invoice.is_settled());
    }
}
