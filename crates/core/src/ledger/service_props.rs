//! Property-based tests for voucher validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use charak_shared::types::{AccountId, BalanceSide};

use super::error::LedgerError;
use super::service::{AccountStatus, VoucherService};
use super::types::{CreateVoucherInput, EntryInput, EntryTarget, VoucherType};
use super::validation::validate_entries;

/// Strategy to generate positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

/// Strategy to generate a list of positive amounts.
fn amounts(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(positive_amount(), 1..=max_len)
}

fn make_entry(side: BalanceSide, amount: Decimal) -> EntryInput {
    EntryInput {
        target: EntryTarget::Account(AccountId::new()),
        side,
        amount,
        narration: None,
    }
}

fn make_input(entries: Vec<EntryInput>) -> CreateVoucherInput {
    CreateVoucherInput {
        voucher_type: VoucherType::Journal,
        date: chrono::NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        narration: "Property test".to_string(),
        patient_id: None,
        bill_ref: None,
        entries,
        correlation_key: None,
    }
}

fn ok_account_lookup(id: AccountId) -> Result<AccountStatus, LedgerError> {
    Ok(AccountStatus {
        id,
        is_active: true,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any set of debit amounts mirrored by one balancing credit is accepted,
    /// and the totals equal the sum of the debits.
    #[test]
    fn prop_mirrored_entries_accepted(debits in amounts(8)) {
        let total: Decimal = debits.iter().copied().sum();
        let mut entries: Vec<EntryInput> = debits
            .iter()
            .map(|amount| make_entry(BalanceSide::Debit, *amount))
            .collect();
        entries.push(make_entry(BalanceSide::Credit, total));

        let totals = validate_entries(&entries);
        prop_assert!(totals.is_ok());
        let totals = totals.unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit, total);
        prop_assert_eq!(totals.credit, total);
    }

    /// Any nonzero difference between the sides is rejected, and the error
    /// reports the exact totals.
    #[test]
    fn prop_imbalance_rejected(amount in positive_amount(), skew in positive_amount()) {
        let entries = vec![
            make_entry(BalanceSide::Debit, amount + skew),
            make_entry(BalanceSide::Credit, amount),
        ];

        match validate_entries(&entries) {
            Err(LedgerError::UnbalancedVoucher { debit, credit }) => {
                prop_assert_eq!(debit, amount + skew);
                prop_assert_eq!(credit, amount);
            }
            other => prop_assert!(false, "expected UnbalancedVoucher, got {other:?}"),
        }
    }

    /// Preparing a voucher preserves every entry's side and amount, in order.
    #[test]
    fn prop_prepare_preserves_entries(debits in amounts(6)) {
        let total: Decimal = debits.iter().copied().sum();
        let mut entries: Vec<EntryInput> = debits
            .iter()
            .map(|amount| make_entry(BalanceSide::Debit, *amount))
            .collect();
        entries.push(make_entry(BalanceSide::Credit, total));
        let input = make_input(entries);

        let prepared = VoucherService::prepare(&input, ok_account_lookup);
        prop_assert!(prepared.is_ok());
        let prepared = prepared.unwrap();

        prop_assert_eq!(prepared.entries.len(), input.entries.len());
        for (resolved, original) in prepared.entries.iter().zip(&input.entries) {
            prop_assert_eq!(resolved.side, original.side);
            prop_assert_eq!(resolved.amount, original.amount);
            prop_assert_eq!(resolved.target, original.target);
        }
    }

    /// The signed amounts of a prepared voucher always sum to zero.
    #[test]
    fn prop_signed_amounts_sum_to_zero(debits in amounts(6)) {
        let total: Decimal = debits.iter().copied().sum();
        let mut entries: Vec<EntryInput> = debits
            .iter()
            .map(|amount| make_entry(BalanceSide::Debit, *amount))
            .collect();
        entries.push(make_entry(BalanceSide::Credit, total));
        let input = make_input(entries);

        let prepared = VoucherService::prepare(&input, ok_account_lookup).unwrap();
        let signed_sum: Decimal = prepared.entries.iter().map(|e| e.signed_amount()).sum();
        prop_assert_eq!(signed_sum, Decimal::ZERO);
    }
}
