//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;

use charak_shared::types::{InvoiceId, PaymentId};

use crate::ledger::LedgerError;

use super::types::PaymentStatus;

/// Errors that can occur during payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Payment or allocation amount must be positive.
    #[error("Amount must be positive")]
    InvalidAmount,

    /// Allocation exceeds what the invoice or the payment can absorb.
    #[error(
        "Over-allocation: requested {requested}, invoice outstanding {invoice_outstanding}, \
         payment unallocated {payment_unallocated}"
    )]
    OverAllocation {
        /// Requested allocation amount.
        requested: Decimal,
        /// Remaining outstanding on the invoice.
        invoice_outstanding: Decimal,
        /// Unallocated remainder of the payment.
        payment_unallocated: Decimal,
    },

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Bounced payments cannot be allocated.
    #[error("Payment {0} has bounced and cannot be allocated")]
    PaymentBounced(PaymentId),

    /// Payment and invoice belong to different patients.
    #[error("Payment and invoice belong to different patients")]
    PatientMismatch,

    /// Invalid payment status transition.
    #[error("Cannot change payment status from {from:?} to {to:?}")]
    InvalidStatusChange {
        /// Current status.
        from: PaymentStatus,
        /// Requested status.
        to: PaymentStatus,
    },

    /// No settlement account configured for this payment mode.
    #[error("No settlement account configured; set the ledger settings first")]
    SettlementAccountNotConfigured,

    /// Underlying ledger error while posting the allocation voucher.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::OverAllocation { .. } => "OVER_ALLOCATION",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::PaymentBounced(_) => "PAYMENT_BOUNCED",
            Self::PatientMismatch => "PATIENT_MISMATCH",
            Self::InvalidStatusChange { .. } => "INVALID_STATUS_CHANGE",
            Self::SettlementAccountNotConfigured => "SETTLEMENT_ACCOUNT_NOT_CONFIGURED",
            Self::Ledger(inner) => inner.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount
            | Self::OverAllocation { .. }
            | Self::PaymentBounced(_)
            | Self::PatientMismatch
            | Self::InvalidStatusChange { .. } => 400,

            Self::PaymentNotFound(_) | Self::InvoiceNotFound(_) => 404,

            Self::SettlementAccountNotConfigured => 422,

            Self::Ledger(inner) => inner.http_status_code(),
        }
    }
}
