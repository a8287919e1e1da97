//! Ledger error types for validation and state errors.
//!
//! Covers voucher validation, account registry, patient ledger lookup and
//! voucher state errors.

use rust_decimal::Decimal;
use thiserror::Error;

use charak_shared::types::{AccountId, PatientId, PatientLedgerId, VoucherId};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Voucher must have at least one entry.
    #[error("Voucher must have at least one entry")]
    EmptyVoucher,

    /// Voucher is not balanced (debits != credits).
    #[error(
        "Voucher is not balanced: debit total {debit} and credit total {credit} differ by {}",
        .debit - .credit
    )]
    UnbalancedVoucher {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry amount cannot be zero.
    #[error("Entry amount cannot be zero")]
    ZeroAmount,

    /// Entry amount cannot be negative.
    #[error("Entry amount cannot be negative")]
    NegativeAmount,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account code already in use.
    #[error("Account code already in use: {0}")]
    DuplicateAccountCode(String),

    /// Account name must not be empty.
    #[error("Account name must not be empty")]
    EmptyAccountName,

    /// Account code must not be empty.
    #[error("Account code must not be empty")]
    EmptyAccountCode,

    // ========== Patient Ledger Errors ==========
    /// Patient ledger not found.
    #[error("Patient ledger not found: {0}")]
    PatientLedgerNotFound(PatientLedgerId),

    /// A ledger already exists for this patient and account.
    #[error("Patient ledger already exists for patient {patient_id} and account {account_id}")]
    PatientLedgerExists {
        /// The patient.
        patient_id: PatientId,
        /// The account.
        account_id: AccountId,
    },

    // ========== Voucher State Errors ==========
    /// Voucher not found.
    #[error("Voucher not found: {0}")]
    VoucherNotFound(VoucherId),

    /// Posted vouchers cannot be cancelled; reverse with a contra voucher.
    #[error("Cannot cancel a posted voucher; create a contra voucher instead")]
    CannotCancelPosted,

    /// Voucher already cancelled.
    #[error("Voucher is already cancelled")]
    AlreadyCancelled,

    /// Only posted vouchers can be reversed.
    #[error("Only posted vouchers can be reversed")]
    CanOnlyReversePosted,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyVoucher => "EMPTY_VOUCHER",
            Self::UnbalancedVoucher { .. } => "UNBALANCED_VOUCHER",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::EmptyAccountName => "EMPTY_ACCOUNT_NAME",
            Self::EmptyAccountCode => "EMPTY_ACCOUNT_CODE",
            Self::PatientLedgerNotFound(_) => "PATIENT_LEDGER_NOT_FOUND",
            Self::PatientLedgerExists { .. } => "PATIENT_LEDGER_EXISTS",
            Self::VoucherNotFound(_) => "VOUCHER_NOT_FOUND",
            Self::CannotCancelPosted => "CANNOT_CANCEL_POSTED",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::CanOnlyReversePosted => "CAN_ONLY_REVERSE_POSTED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::EmptyVoucher
            | Self::UnbalancedVoucher { .. }
            | Self::ZeroAmount
            | Self::NegativeAmount
            | Self::AccountInactive(_)
            | Self::EmptyAccountName
            | Self::EmptyAccountCode
            | Self::CannotCancelPosted
            | Self::AlreadyCancelled
            | Self::CanOnlyReversePosted => 400,

            // 404 Not Found
            Self::AccountNotFound(_)
            | Self::PatientLedgerNotFound(_)
            | Self::VoucherNotFound(_) => 404,

            // 409 Conflict - uniqueness errors
            Self::DuplicateAccountCode(_) | Self::PatientLedgerExists { .. } => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::EmptyVoucher.error_code(), "EMPTY_VOUCHER");
        assert_eq!(
            LedgerError::UnbalancedVoucher {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_VOUCHER"
        );
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::EmptyVoucher.http_status_code(), 400);
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::new()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::DuplicateAccountCode("1000".into()).http_status_code(),
            409
        );
    }

    #[test]
    fn test_unbalanced_display_names_difference() {
        let err = LedgerError::UnbalancedVoucher {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Voucher is not balanced: debit total 100.00 and credit total 50.00 differ by 50.00"
        );
    }
}
