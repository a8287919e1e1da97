//! Property-based tests for patient ledger balance consistency.

use proptest::prelude::*;
use rust_decimal::Decimal;

use charak_shared::types::{AccountId, BalanceSide, PatientId, SignedBalance};

use super::service::{LedgerEvent, PatientLedgerService};
use super::types::PatientLedger;

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

fn side_strategy() -> impl Strategy<Value = BalanceSide> {
    prop_oneof![Just(BalanceSide::Debit), Just(BalanceSide::Credit)]
}

fn events_strategy(max_len: usize) -> impl Strategy<Value = Vec<LedgerEvent>> {
    prop::collection::vec((side_strategy(), positive_amount()), 0..=max_len).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (side, amount))| LedgerEvent {
                voucher_number: format!("JV-{:06}", i + 1),
                side,
                amount,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Cache consistency: applying entries one by one always matches
    /// replaying the full history.
    #[test]
    fn prop_materialized_balance_matches_replay(events in events_strategy(20)) {
        let mut ledger = PatientLedger::new(
            PatientId::new(),
            AccountId::new(),
            Decimal::ZERO,
            BalanceSide::Debit,
        );
        for event in &events {
            PatientLedgerService::apply_entry(&mut ledger, event.side, event.amount);
        }

        let replayed = PatientLedgerService::replay(ledger.opening_signed(), events);
        prop_assert_eq!(replayed, ledger.balance);
    }

    /// Replay is order-independent: shuffled history produces the same balance.
    #[test]
    fn prop_replay_order_independent(events in events_strategy(12)) {
        let opening = SignedBalance::ZERO;
        let forward = PatientLedgerService::replay(opening, events.clone());

        let mut reversed = events;
        reversed.reverse();
        let backward = PatientLedgerService::replay(opening, reversed);

        prop_assert_eq!(forward, backward);
    }

    /// Splitting into (amount, side) and recombining loses nothing.
    #[test]
    fn prop_display_projection_roundtrip(events in events_strategy(12)) {
        let balance = PatientLedgerService::replay(SignedBalance::ZERO, events);
        let (amount, side) = balance.split();
        prop_assert_eq!(SignedBalance::from_side(amount, side), balance);
        prop_assert!(amount >= Decimal::ZERO);
    }

    /// Repair is idempotent: a second repair never changes the balance again.
    #[test]
    fn prop_repair_idempotent(events in events_strategy(12)) {
        let mut ledger = PatientLedger::new(
            PatientId::new(),
            AccountId::new(),
            Decimal::ZERO,
            BalanceSide::Debit,
        );
        PatientLedgerService::repair(&mut ledger, events.clone());
        prop_assert!(!PatientLedgerService::repair(&mut ledger, events));
    }
}
