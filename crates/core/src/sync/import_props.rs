//! Property-based tests for import idempotency.

use std::collections::BTreeMap;

use proptest::prelude::*;

use charak_shared::types::AccountId;

use super::document::LedgerRecord;
use super::import::{ExistingAccount, ImportService, LedgerAction};

/// Strategy for distinct ledger names (lowercase so document-level
/// case-insensitive dedup never kicks in).
fn ledger_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,12}", 1..12)
        .prop_map(|names| names.into_iter().collect())
}

fn record(name: &str, key: Option<String>) -> LedgerRecord {
    LedgerRecord {
        name: name.to_string(),
        code: None,
        key,
        account_type: Some("asset".to_string()),
        opening_balance: None,
        opening_side: None,
        active: true,
        extra: BTreeMap::new(),
    }
}

/// Simulates applying a plan's inserts/attaches to an account set.
fn apply(
    plan: &[LedgerAction],
    mut accounts: Vec<ExistingAccount>,
) -> Vec<ExistingAccount> {
    for action in plan {
        match action {
            LedgerAction::Insert(spec) => accounts.push(ExistingAccount {
                id: AccountId::new(),
                code: spec.code.clone(),
                name: spec.name.clone(),
                correlation_key: spec.correlation_key.clone(),
            }),
            LedgerAction::Attach {
                id,
                correlation_key,
            } => {
                if let Some(account) = accounts.iter_mut().find(|a| a.id == *id) {
                    account.correlation_key = Some(correlation_key.clone());
                }
            }
            LedgerAction::Update { .. } | LedgerAction::Skip { .. } => {}
        }
    }
    accounts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Importing the same document twice with update_existing=false creates
    /// no records on the second pass.
    #[test]
    fn prop_reimport_creates_nothing(names in ledger_names(), with_keys in any::<bool>()) {
        let records: Vec<LedgerRecord> = names
            .iter()
            .enumerate()
            .map(|(i, name)| record(name, with_keys.then(|| format!("K-{i}"))))
            .collect();

        let first = ImportService::plan_ledgers(&records, &[], false);
        prop_assert!(first.failures.is_empty());
        let inserted = first
            .actions
            .iter()
            .filter(|a| matches!(a, LedgerAction::Insert(_)))
            .count();
        prop_assert_eq!(inserted, records.len());

        let accounts = apply(&first.actions, Vec::new());
        let second = ImportService::plan_ledgers(&records, &accounts, false);
        let second_inserts = second
            .actions
            .iter()
            .filter(|a| matches!(a, LedgerAction::Insert(_)))
            .count();
        prop_assert_eq!(second_inserts, 0, "re-import must not create duplicates");
    }

    /// Generated codes are stable across plans and distinct per name.
    #[test]
    fn prop_generated_codes_stable(names in ledger_names()) {
        let records: Vec<LedgerRecord> =
            names.iter().map(|name| record(name, None)).collect();

        let plan_a = ImportService::plan_ledgers(&records, &[], false);
        let plan_b = ImportService::plan_ledgers(&records, &[], false);

        let codes = |plan: &super::import::LedgerImportPlan| -> Vec<String> {
            plan.actions
                .iter()
                .filter_map(|action| match action {
                    LedgerAction::Insert(spec) => Some(spec.code.clone()),
                    _ => None,
                })
                .collect()
        };
        prop_assert_eq!(codes(&plan_a), codes(&plan_b));
    }

    /// A third pass after attaching keys still changes nothing: the plan
    /// reaches a fixed point.
    #[test]
    fn prop_import_reaches_fixed_point(names in ledger_names()) {
        let records: Vec<LedgerRecord> = names
            .iter()
            .enumerate()
            .map(|(i, name)| record(name, Some(format!("K-{i}"))))
            .collect();

        let mut accounts = Vec::new();
        for _ in 0..3 {
            let plan = ImportService::plan_ledgers(&records, &accounts, false);
            accounts = apply(&plan.actions, accounts);
        }
        prop_assert_eq!(accounts.len(), records.len());

        let final_plan = ImportService::plan_ledgers(&records, &accounts, false);
        for action in &final_plan.actions {
            prop_assert!(matches!(action, LedgerAction::Skip { .. }));
        }
    }
}
