//! Patient ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use charak_shared::types::{AccountId, BalanceSide, PatientId, PatientLedgerId, SignedBalance};

/// Running balance of one patient under one account.
///
/// Mutated only by voucher posting, never directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientLedger {
    /// Unique identifier.
    pub id: PatientLedgerId,
    /// The patient.
    pub patient_id: PatientId,
    /// The account the ledger sits under.
    pub account_id: AccountId,
    /// Opening balance amount.
    pub opening_balance: Decimal,
    /// Side the opening balance sits on.
    pub opening_side: BalanceSide,
    /// Current balance as one signed figure (positive = debit side).
    pub balance: SignedBalance,
}

impl PatientLedger {
    /// Creates a new ledger row starting from its opening balance.
    #[must_use]
    pub fn new(
        patient_id: PatientId,
        account_id: AccountId,
        opening_balance: Decimal,
        opening_side: BalanceSide,
    ) -> Self {
        Self {
            id: PatientLedgerId::new(),
            patient_id,
            account_id,
            opening_balance,
            opening_side,
            balance: SignedBalance::from_side(opening_balance, opening_side),
        }
    }

    /// Returns the opening balance as a signed figure.
    #[must_use]
    pub fn opening_signed(&self) -> SignedBalance {
        SignedBalance::from_side(self.opening_balance, self.opening_side)
    }

    /// Projects the current balance to `(amount, side)` for display.
    #[must_use]
    pub fn display_balance(&self) -> (Decimal, BalanceSide) {
        self.balance.split()
    }
}
