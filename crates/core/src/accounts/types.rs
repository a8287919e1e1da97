//! Account domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use charak_shared::types::{AccountId, BalanceSide, SignedBalance};

/// Account classification.
///
/// Determines the normal balance side:
/// - Asset/Expense accounts are debit-normal
/// - Liability/Equity/Income accounts are credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (cash, bank, receivables).
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Income account (consultation fees, pharmacy sales).
    Income,
    /// Expense account.
    Expense,
}

impl AccountType {
    /// Returns the side a positive balance normally sits on.
    #[must_use]
    pub const fn normal_side(self) -> BalanceSide {
        match self {
            Self::Asset | Self::Expense => BalanceSide::Debit,
            Self::Liability | Self::Equity | Self::Income => BalanceSide::Credit,
        }
    }

    /// Returns true for debit-normal account types.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self.normal_side(), BalanceSide::Debit)
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Income => "income",
            Self::Expense => "expense",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            // External packages commonly label income accounts "revenue".
            "income" | "revenue" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown account type: {s}")),
        }
    }
}

/// A chart of accounts entry.
///
/// Accounts are never physically deleted, only deactivated, so historical
/// vouchers keep resolving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique, sortable account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Opening balance amount.
    pub opening_balance: Decimal,
    /// Side the opening balance sits on.
    pub opening_side: BalanceSide,
    /// Whether the account accepts new postings.
    pub active: bool,
    /// Stable identifier in the external bookkeeping system, once matched.
    pub correlation_key: Option<String>,
}

impl Account {
    /// Returns the opening balance as a signed figure.
    #[must_use]
    pub fn opening_signed(&self) -> SignedBalance {
        SignedBalance::from_side(self.opening_balance, self.opening_side)
    }
}

/// Input for creating or updating an account through the registry.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Account code; generated when omitted.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Opening balance amount.
    pub opening_balance: Decimal,
    /// Side the opening balance sits on.
    pub opening_side: BalanceSide,
    /// External correlation key, if known.
    pub correlation_key: Option<String>,
}

/// On-demand account balance computed from posted entries.
#[derive(Debug, Clone, Serialize)]
pub struct ComputedBalance {
    /// The account.
    pub account_id: AccountId,
    /// Total posted debits.
    pub debit_total: Decimal,
    /// Total posted credits.
    pub credit_total: Decimal,
    /// Net signed balance including the opening balance.
    pub balance: SignedBalance,
}

impl ComputedBalance {
    /// Starts a computation from the account's opening balance.
    #[must_use]
    pub fn opening(account: &Account) -> Self {
        Self {
            account_id: account.id,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: account.opening_signed(),
        }
    }

    /// Folds one posted entry into the totals.
    pub fn add(&mut self, side: BalanceSide, amount: Decimal) {
        match side {
            BalanceSide::Debit => self.debit_total += amount,
            BalanceSide::Credit => self.credit_total += amount,
        }
        self.balance = self.balance.apply(side, amount);
    }
}
