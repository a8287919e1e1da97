//! Ledger settings repository.

use charak_shared::types::AccountId;

use crate::mem::{LedgerSettings, MemStore};

/// Repository for the settlement/receivable account settings.
#[derive(Clone)]
pub struct SettingsRepository {
    store: MemStore,
}

impl SettingsRepository {
    /// Creates a new repository handle.
    #[must_use]
    pub const fn new(store: MemStore) -> Self {
        Self { store }
    }

    /// Returns the current settings.
    #[must_use]
    pub fn get(&self) -> LedgerSettings {
        self.store.read().settings.clone()
    }

    /// Replaces the settings.
    pub fn update(
        &self,
        receivable_account_id: Option<AccountId>,
        cash_account_id: Option<AccountId>,
        bank_account_id: Option<AccountId>,
    ) -> LedgerSettings {
        let mut state = self.store.write();
        state.settings = LedgerSettings {
            receivable_account_id,
            cash_account_id,
            bank_account_id,
        };
        state.settings.clone()
    }
}
