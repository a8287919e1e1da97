//! Voucher domain types for creation and validation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use charak_shared::types::{AccountId, BalanceSide, PatientId, VoucherEntryId, VoucherId};

/// Voucher type classification.
///
/// Determines the numbering prefix and shows up in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherType {
    /// General journal voucher (charges, adjustments).
    Journal,
    /// Receipt voucher (money coming in, e.g. payment allocations).
    Receipt,
    /// Payment voucher (money going out).
    Payment,
    /// Contra voucher reversing a posted voucher.
    Contra,
}

impl VoucherType {
    /// Returns the voucher number prefix for this type.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Journal => "JV",
            Self::Receipt => "RV",
            Self::Payment => "PV",
            Self::Contra => "CV",
        }
    }
}

impl std::str::FromStr for VoucherType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "journal" => Ok(Self::Journal),
            "receipt" => Ok(Self::Receipt),
            "payment" => Ok(Self::Payment),
            "contra" => Ok(Self::Contra),
            _ => Err(format!("Unknown voucher type: {s}")),
        }
    }
}

/// Voucher lifecycle status.
///
/// Vouchers move `Pending -> Posted` automatically on creation, because all
/// entries validate and post atomically. `Posted` is terminal; posted
/// vouchers are only ever reversed by a contra voucher, never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherStatus {
    /// Voucher created but entries not yet applied.
    Pending,
    /// Voucher posted to the ledger (immutable).
    Posted,
    /// Voucher cancelled before posting (immutable).
    Cancelled,
}

impl VoucherStatus {
    /// Returns true if the voucher can still be cancelled.
    #[must_use]
    pub fn can_cancel(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the voucher is immutable.
    #[must_use]
    pub fn is_immutable(self) -> bool {
        matches!(self, Self::Posted | Self::Cancelled)
    }
}

/// Posting target of one voucher entry.
///
/// Every entry targets exactly one of an account or a per-patient ledger;
/// both kinds may appear within one voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryTarget {
    /// Post against an account directly.
    Account(AccountId),
    /// Post against the ledger of one patient under one account.
    Patient {
        /// The patient whose ledger is affected.
        patient_id: PatientId,
        /// The account the patient ledger sits under.
        account_id: AccountId,
    },
}

impl EntryTarget {
    /// Returns the account the entry ultimately posts under.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        match self {
            Self::Account(id) => *id,
            Self::Patient { account_id, .. } => *account_id,
        }
    }

    /// Returns the patient, if this targets a patient ledger.
    #[must_use]
    pub const fn patient_id(&self) -> Option<PatientId> {
        match self {
            Self::Account(_) => None,
            Self::Patient { patient_id, .. } => Some(*patient_id),
        }
    }
}

/// A single posted entry within a voucher.
///
/// Entries are owned exclusively by their voucher and cannot outlive it or
/// be reassigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherEntry {
    /// Unique identifier.
    pub id: VoucherEntryId,
    /// What this entry posts against.
    pub target: EntryTarget,
    /// Debit or credit.
    pub side: BalanceSide,
    /// Entry amount (always positive).
    pub amount: Decimal,
    /// Optional line narration.
    pub narration: Option<String>,
}

impl VoucherEntry {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            BalanceSide::Debit => self.amount,
            BalanceSide::Credit => -self.amount,
        }
    }

    /// Debit column projection (0 for credit entries).
    #[must_use]
    pub fn debit(&self) -> Decimal {
        match self.side {
            BalanceSide::Debit => self.amount,
            BalanceSide::Credit => Decimal::ZERO,
        }
    }

    /// Credit column projection (0 for debit entries).
    #[must_use]
    pub fn credit(&self) -> Decimal {
        match self.side {
            BalanceSide::Credit => self.amount,
            BalanceSide::Debit => Decimal::ZERO,
        }
    }
}

/// Input for a single entry when creating a voucher.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// What this entry posts against.
    pub target: EntryTarget,
    /// Debit or credit.
    pub side: BalanceSide,
    /// Entry amount (must be positive).
    pub amount: Decimal,
    /// Optional line narration.
    pub narration: Option<String>,
}

/// Input for creating a new voucher.
#[derive(Debug, Clone)]
pub struct CreateVoucherInput {
    /// Voucher type (determines the number prefix).
    pub voucher_type: VoucherType,
    /// Voucher date.
    pub date: NaiveDate,
    /// Narration describing the transaction.
    pub narration: String,
    /// Patient this voucher relates to, if any.
    pub patient_id: Option<PatientId>,
    /// Bill or invoice reference, if any.
    pub bill_ref: Option<String>,
    /// The entries (must balance).
    pub entries: Vec<EntryInput>,
    /// External correlation key for imported vouchers.
    pub correlation_key: Option<String>,
}

/// An atomic, balanced financial transaction record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    /// Unique identifier.
    pub id: VoucherId,
    /// Unique number, monotonic per type (e.g. `JV-000042`).
    pub number: String,
    /// Voucher date.
    pub date: NaiveDate,
    /// Voucher type.
    pub voucher_type: VoucherType,
    /// Narration describing the transaction.
    pub narration: String,
    /// Patient this voucher relates to, if any.
    pub patient_id: Option<PatientId>,
    /// Bill or invoice reference, if any.
    pub bill_ref: Option<String>,
    /// Sum of either side's entries (both sides are equal by invariant).
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: VoucherStatus,
    /// External correlation key for imported vouchers.
    pub correlation_key: Option<String>,
    /// When the voucher was created.
    pub created_at: DateTime<Utc>,
    /// The entries, owned exclusively by this voucher.
    pub entries: Vec<VoucherEntry>,
}

/// Voucher totals for validation and display.
#[derive(Debug, Clone, Copy)]
pub struct VoucherTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether the voucher is balanced (debits == credits).
    pub is_balanced: bool,
}

impl VoucherTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}
