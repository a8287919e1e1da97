//! Account registry repository.
//!
//! The single entry point for account creation and updates, shared by the
//! interactive API and the sync engine so the same rules apply regardless
//! of origin.

use charak_core::accounts::{Account, ComputedBalance, NewAccount};
use charak_core::ledger::{LedgerError, VoucherStatus};
use charak_core::sync::LedgerAction;
use charak_shared::types::AccountId;

use crate::mem::MemStore;

/// Repository for the chart of accounts.
#[derive(Clone)]
pub struct AccountRepository {
    store: MemStore,
}

impl AccountRepository {
    /// Creates a new repository handle.
    #[must_use]
    pub const fn new(store: MemStore) -> Self {
        Self { store }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error for empty names/codes or duplicate codes.
    pub fn create(&self, input: NewAccount) -> Result<Account, LedgerError> {
        let mut state = self.store.write();

        if input.name.trim().is_empty() {
            return Err(LedgerError::EmptyAccountName);
        }
        if input.code.trim().is_empty() {
            return Err(LedgerError::EmptyAccountCode);
        }
        if state
            .accounts
            .values()
            .any(|account| account.code.eq_ignore_ascii_case(&input.code))
        {
            return Err(LedgerError::DuplicateAccountCode(input.code));
        }

        let account = Account {
            id: AccountId::new(),
            code: input.code,
            name: input.name.trim().to_string(),
            account_type: input.account_type,
            opening_balance: input.opening_balance,
            opening_side: input.opening_side,
            active: true,
            correlation_key: input.correlation_key,
        };
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    /// Fetches an account by id.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if missing.
    pub fn get(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.store
            .read()
            .accounts
            .get(&id)
            .cloned()
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Fetches an account by code.
    #[must_use]
    pub fn get_by_code(&self, code: &str) -> Option<Account> {
        self.store
            .read()
            .accounts
            .values()
            .find(|account| account.code.eq_ignore_ascii_case(code))
            .cloned()
    }

    /// Lists accounts sorted by code.
    #[must_use]
    pub fn list(&self, active_only: bool) -> Vec<Account> {
        let state = self.store.read();
        let mut accounts: Vec<Account> = state
            .accounts
            .values()
            .filter(|account| !active_only || account.active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    /// Deactivates an account. Accounts are never deleted so historical
    /// vouchers keep resolving.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if missing.
    pub fn deactivate(&self, id: AccountId) -> Result<Account, LedgerError> {
        let mut state = self.store.write();
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or(LedgerError::AccountNotFound(id))?;
        account.active = false;
        Ok(account.clone())
    }

    /// Computes the account's balance on demand from posted entries.
    ///
    /// Accounts carry no materialized balance; summing the posted history
    /// every time avoids a second source of truth. Entries posted against
    /// patient ledgers count toward their control account here.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if missing.
    pub fn computed_balance(&self, id: AccountId) -> Result<ComputedBalance, LedgerError> {
        let state = self.store.read();
        let account = state
            .accounts
            .get(&id)
            .ok_or(LedgerError::AccountNotFound(id))?;

        let mut computed = ComputedBalance::opening(account);
        for voucher in state.vouchers.values() {
            if voucher.status != VoucherStatus::Posted {
                continue;
            }
            for entry in &voucher.entries {
                if entry.target.account_id() == id {
                    computed.add(entry.side, entry.amount);
                }
            }
        }
        Ok(computed)
    }

    /// Applies one planned import action through the normal registry rules.
    ///
    /// Returns the touched account, or `None` for skips.
    ///
    /// # Errors
    ///
    /// Propagates registry errors (e.g. a generated code colliding with an
    /// existing one); the sync engine records these as per-record failures.
    pub fn apply_ledger_action(&self, action: LedgerAction) -> Result<Option<Account>, LedgerError> {
        match action {
            LedgerAction::Insert(spec) => self
                .create(NewAccount {
                    code: spec.code,
                    name: spec.name,
                    account_type: spec.account_type,
                    opening_balance: spec.opening_balance,
                    opening_side: spec.opening_side,
                    correlation_key: spec.correlation_key,
                })
                .map(Some),
            LedgerAction::Update { id, spec } => {
                let mut state = self.store.write();
                let account = state
                    .accounts
                    .get_mut(&id)
                    .ok_or(LedgerError::AccountNotFound(id))?;
                account.name = spec.name;
                account.account_type = spec.account_type;
                account.opening_balance = spec.opening_balance;
                account.opening_side = spec.opening_side;
                account.active = spec.active;
                if spec.correlation_key.is_some() {
                    account.correlation_key = spec.correlation_key;
                }
                Ok(Some(account.clone()))
            }
            LedgerAction::Attach {
                id,
                correlation_key,
            } => {
                let mut state = self.store.write();
                let account = state
                    .accounts
                    .get_mut(&id)
                    .ok_or(LedgerError::AccountNotFound(id))?;
                account.correlation_key = Some(correlation_key);
                Ok(Some(account.clone()))
            }
            LedgerAction::Skip { .. } => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charak_core::accounts::AccountType;
    use charak_core::sync::ExternalSyncConfig;
    use charak_shared::config::ExternalConfig;
    use charak_shared::types::BalanceSide;
    use rust_decimal::Decimal;

    fn make_store() -> MemStore {
        MemStore::new(ExternalSyncConfig::from_defaults(&ExternalConfig {
            host: "localhost".to_string(),
            port: 9000,
            company: String::new(),
            sync_enabled: false,
            sync_frequency: "manual".to_string(),
            update_existing: false,
        }))
    }

    fn new_account(code: &str, name: &str) -> NewAccount {
        NewAccount {
            code: code.to_string(),
            name: name.to_string(),
            account_type: AccountType::Income,
            opening_balance: Decimal::ZERO,
            opening_side: BalanceSide::Credit,
            correlation_key: None,
        }
    }

    #[test]
    fn test_create_and_get() {
        let repo = AccountRepository::new(make_store());
        let account = repo.create(new_account("4000", "Consultation Income")).unwrap();
        assert_eq!(repo.get(account.id).unwrap().name, "Consultation Income");
        assert!(account.active);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let repo = AccountRepository::new(make_store());
        repo.create(new_account("4000", "Consultation Income")).unwrap();
        assert!(matches!(
            repo.create(new_account("4000", "Other")),
            Err(LedgerError::DuplicateAccountCode(_))
        ));
    }

    #[test]
    fn test_empty_fields_rejected() {
        let repo = AccountRepository::new(make_store());
        assert!(matches!(
            repo.create(new_account("4000", "  ")),
            Err(LedgerError::EmptyAccountName)
        ));
        assert!(matches!(
            repo.create(new_account("", "Cash")),
            Err(LedgerError::EmptyAccountCode)
        ));
    }

    #[test]
    fn test_list_sorted_and_filtered() {
        let repo = AccountRepository::new(make_store());
        let b = repo.create(new_account("2000", "B")).unwrap();
        repo.create(new_account("1000", "A")).unwrap();
        repo.deactivate(b.id).unwrap();

        let all = repo.list(false);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].code, "1000");

        let active = repo.list(true);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].code, "1000");
    }
}
