//! Patient ledger balance maintenance and repair.

use charak_shared::types::{BalanceSide, SignedBalance};
use rust_decimal::Decimal;

use super::types::PatientLedger;

/// One posted voucher entry affecting a patient ledger, as seen in history.
#[derive(Debug, Clone)]
pub struct LedgerEvent {
    /// Number of the voucher the entry belongs to.
    pub voucher_number: String,
    /// Debit or credit.
    pub side: BalanceSide,
    /// Entry amount.
    pub amount: Decimal,
}

/// Stateless service maintaining patient ledger balances.
pub struct PatientLedgerService;

impl PatientLedgerService {
    /// Applies one posted entry to the ledger's materialized balance.
    pub fn apply_entry(ledger: &mut PatientLedger, side: BalanceSide, amount: Decimal) {
        ledger.balance = ledger.balance.apply(side, amount);
    }

    /// Re-derives a balance by replaying the full entry history.
    ///
    /// Events are replayed in voucher-number order. Addition is commutative,
    /// so the result is independent of the order events arrive in; sorting
    /// keeps the repair deterministic and auditable.
    #[must_use]
    pub fn replay(opening: SignedBalance, mut events: Vec<LedgerEvent>) -> SignedBalance {
        events.sort_by(|a, b| a.voucher_number.cmp(&b.voucher_number));
        events
            .into_iter()
            .fold(opening, |balance, event| balance.apply(event.side, event.amount))
    }

    /// Repairs a ledger whose materialized balance drifted from its history.
    ///
    /// Returns true if the balance changed.
    pub fn repair(ledger: &mut PatientLedger, events: Vec<LedgerEvent>) -> bool {
        let recomputed = Self::replay(ledger.opening_signed(), events);
        let changed = recomputed != ledger.balance;
        ledger.balance = recomputed;
        changed
    }
}
