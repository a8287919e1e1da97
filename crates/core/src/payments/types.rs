//! Payment domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use charak_shared::types::{AllocationId, InvoiceId, PatientId, PaymentId, VoucherId};

use super::error::PaymentError;

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Cash at the counter.
    Cash,
    /// Card (POS terminal).
    Card,
    /// UPI or other electronic transfer.
    Upi,
    /// Cheque (clears later).
    Cheque,
    /// Direct bank transfer.
    BankTransfer,
}

impl PaymentMode {
    /// The status a freshly recorded payment starts in.
    ///
    /// Cheques stay pending until manually cleared; everything else clears
    /// immediately.
    #[must_use]
    pub const fn initial_status(self) -> PaymentStatus {
        match self {
            Self::Cheque => PaymentStatus::Pending,
            Self::Cash | Self::Card | Self::Upi | Self::BankTransfer => PaymentStatus::Cleared,
        }
    }
}

/// Lifecycle status of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Funds received.
    Cleared,
    /// Awaiting clearance (cheques).
    Pending,
    /// Payment bounced; cannot be allocated.
    Bounced,
}

impl PaymentStatus {
    /// Returns true if the payment may be allocated against invoices.
    #[must_use]
    pub const fn can_allocate(self) -> bool {
        !matches!(self, Self::Bounced)
    }
}

/// A recorded payment from a patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentTransaction {
    /// Unique identifier.
    pub id: PaymentId,
    /// The paying patient.
    pub patient_id: PatientId,
    /// Date the payment was received.
    pub payment_date: NaiveDate,
    /// How the payment was made.
    pub mode: PaymentMode,
    /// Payment amount.
    pub amount: Decimal,
    /// Lifecycle status.
    pub status: PaymentStatus,
    /// Bank name for cheque/transfer payments.
    pub bank_name: Option<String>,
    /// Cheque number, if paid by cheque.
    pub cheque_number: Option<String>,
    /// Cheque date, if paid by cheque.
    pub cheque_date: Option<NaiveDate>,
    /// Amount not yet allocated to any invoice.
    pub unallocated: Decimal,
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// The paying patient.
    pub patient_id: PatientId,
    /// Date the payment was received.
    pub payment_date: NaiveDate,
    /// How the payment was made.
    pub mode: PaymentMode,
    /// Payment amount (must be positive).
    pub amount: Decimal,
    /// Bank name for cheque/transfer payments.
    pub bank_name: Option<String>,
    /// Cheque number, if paid by cheque.
    pub cheque_number: Option<String>,
    /// Cheque date, if paid by cheque.
    pub cheque_date: Option<NaiveDate>,
}

impl PaymentTransaction {
    /// Records a new payment in its mode's initial status.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or negative.
    pub fn record(input: RecordPaymentInput) -> Result<Self, PaymentError> {
        if input.amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount);
        }

        Ok(Self {
            id: PaymentId::new(),
            patient_id: input.patient_id,
            payment_date: input.payment_date,
            mode: input.mode,
            amount: input.amount,
            status: input.mode.initial_status(),
            bank_name: input.bank_name,
            cheque_number: input.cheque_number,
            cheque_date: input.cheque_date,
            unallocated: input.amount,
        })
    }
}

/// A link between one payment and one invoice.
///
/// A payment may fan out over multiple invoices; an invoice may receive
/// allocations from multiple payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// Unique identifier.
    pub id: AllocationId,
    /// The payment the money comes from.
    pub payment_id: PaymentId,
    /// The invoice the money settles.
    pub invoice_id: InvoiceId,
    /// Allocated amount.
    pub amount: Decimal,
    /// The receipt voucher this allocation posted.
    pub voucher_id: VoucherId,
}
