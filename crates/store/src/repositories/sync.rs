//! Sync configuration and run-history repository.

use charak_core::sync::{
    ExternalSyncConfig, ExternalSyncRun, FieldMapping, SyncFrequency,
};

use crate::mem::MemStore;

/// Partial update of the sync configuration.
///
/// Unset fields keep their current value, so the API can PATCH-style update
/// the single row.
#[derive(Debug, Clone, Default)]
pub struct SyncConfigUpdate {
    /// External system host.
    pub host: Option<String>,
    /// External system port.
    pub port: Option<u16>,
    /// Company identifier.
    pub company: Option<String>,
    /// Whether synchronization runs at all.
    pub sync_enabled: Option<bool>,
    /// How often scheduled runs fire.
    pub frequency: Option<SyncFrequency>,
    /// Whether re-imports overwrite previously imported fields.
    pub update_existing: Option<bool>,
    /// Field-name mapping rules.
    pub mapping: Option<FieldMapping>,
}

/// Repository for the sync configuration row and run history.
#[derive(Clone)]
pub struct SyncRepository {
    store: MemStore,
}

impl SyncRepository {
    /// Creates a new repository handle.
    #[must_use]
    pub const fn new(store: MemStore) -> Self {
        Self { store }
    }

    /// Returns the current configuration.
    ///
    /// The engine calls this at the start of every run and every scheduler
    /// tick, so edits take effect without a restart.
    #[must_use]
    pub fn config(&self) -> ExternalSyncConfig {
        self.store.read().sync_config.clone()
    }

    /// Applies a partial configuration update.
    pub fn update_config(&self, update: SyncConfigUpdate) -> ExternalSyncConfig {
        let mut state = self.store.write();
        let config = &mut state.sync_config;
        if let Some(host) = update.host {
            config.host = host;
        }
        if let Some(port) = update.port {
            config.port = port;
        }
        if let Some(company) = update.company {
            config.company = company;
        }
        if let Some(sync_enabled) = update.sync_enabled {
            config.sync_enabled = sync_enabled;
        }
        if let Some(frequency) = update.frequency {
            config.frequency = frequency;
        }
        if let Some(update_existing) = update.update_existing {
            config.update_existing = update_existing;
        }
        if let Some(mapping) = update.mapping {
            config.mapping = mapping;
        }
        config.clone()
    }

    /// Inserts or replaces a run record by id.
    pub fn record_run(&self, run: &ExternalSyncRun) {
        let mut state = self.store.write();
        if let Some(existing) = state.sync_runs.iter_mut().find(|r| r.id == run.id) {
            *existing = run.clone();
        } else {
            state.sync_runs.push(run.clone());
        }
    }

    /// Returns the most recent `n` runs, newest first.
    #[must_use]
    pub fn recent_runs(&self, n: usize) -> Vec<ExternalSyncRun> {
        let state = self.store.read();
        state.sync_runs.iter().rev().take(n).cloned().collect()
    }

    /// Returns the currently running run, if any.
    #[must_use]
    pub fn running_run(&self) -> Option<ExternalSyncRun> {
        self.store
            .read()
            .sync_runs
            .iter()
            .find(|run| run.is_running())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charak_core::sync::SyncDirection;
    use charak_shared::config::ExternalConfig;

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

    #[test]
    fn test_partial_config_update() {
        let repo = SyncRepository::new(make_store());
        let before = repo.config();

        let after = repo.update_config(SyncConfigUpdate {
            sync_enabled: Some(true),
            frequency: Some(SyncFrequency::RealTime),
            ..SyncConfigUpdate::default()
        });

        assert!(after.sync_enabled);
        assert_eq!(after.frequency, SyncFrequency::RealTime);
        // Untouched fields survive, including identity.
        assert_eq!(after.host, before.host);
        assert_eq!(after.id, before.id);
    }

    #[test]
    fn test_run_records_upsert_by_id() {
        let repo = SyncRepository::new(make_store());
        let mut run = ExternalSyncRun::start(SyncDirection::Import);
        repo.record_run(&run);
        assert!(repo.running_run().is_some());

        run.succeed(5, vec![]);
        repo.record_run(&run);
        assert!(repo.running_run().is_none());
        assert_eq!(repo.recent_runs(10).len(), 1);
        assert_eq!(repo.recent_runs(10)[0].records_processed, 5);
    }
}
