//! Signed balance arithmetic for debit/credit bookkeeping.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Balances are stored as a single signed `Decimal` (positive = debit side,
//! negative = credit side) and only projected into the two-column
//! debit/credit form at the I/O boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a ledger balance or entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceSide {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl BalanceSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

impl std::fmt::Display for BalanceSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debit => write!(f, "debit"),
            Self::Credit => write!(f, "credit"),
        }
    }
}

impl std::str::FromStr for BalanceSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" | "dr" => Ok(Self::Debit),
            "credit" | "cr" => Ok(Self::Credit),
            _ => Err(format!("Unknown balance side: {s}")),
        }
    }
}

/// A running balance stored as one signed figure.
///
/// Positive means the balance sits on the debit side, negative on the credit
/// side. Keeping a single signed number avoids the sign-flip bugs endemic to
/// two-column running balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedBalance(Decimal);

impl SignedBalance {
    /// The zero balance.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Builds a balance from an unsigned amount and its side.
    #[must_use]
    pub fn from_side(amount: Decimal, side: BalanceSide) -> Self {
        match side {
            BalanceSide::Debit => Self(amount),
            BalanceSide::Credit => Self(-amount),
        }
    }

    /// Applies one entry: debits add, credits subtract.
    #[must_use]
    pub fn apply(self, side: BalanceSide, amount: Decimal) -> Self {
        match side {
            BalanceSide::Debit => Self(self.0 + amount),
            BalanceSide::Credit => Self(self.0 - amount),
        }
    }

    /// Projects to `(amount, side)` for display.
    ///
    /// A zero balance is reported on the debit side.
    #[must_use]
    pub fn split(self) -> (Decimal, BalanceSide) {
        if self.0.is_sign_negative() && !self.0.is_zero() {
            (-self.0, BalanceSide::Credit)
        } else {
            (self.0, BalanceSide::Debit)
        }
    }

    /// Returns the raw signed figure.
    #[must_use]
    pub const fn raw(self) -> Decimal {
        self.0
    }

    /// Returns true if the balance is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl std::ops::Add for SignedBalance {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}
