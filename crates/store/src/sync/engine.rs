//! The sync engine: import/export orchestration under a single-flight guard.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use tracing::{debug, info, warn};

use charak_core::sync::{
    parse_document, serialize_document, export_file_name, ExistingAccount, ExportKind,
    ExportService, ExternalDocument, ExternalSyncConfig, ExternalSyncRun, ImportService,
    LedgerAction, LedgerRecord, PushEvent, RecordFailure, SyncDirection, SyncError, SyncFrequency,
    VoucherAction, VoucherRecord,
};
use charak_shared::types::SyncConfigId;

use crate::mem::MemStore;
use crate::repositories::{AccountRepository, SyncRepository, VoucherRepository};

use super::cache::ReadViewCache;
use super::client::ExternalClient;

/// Background engine keeping the internal ledger and the external
/// bookkeeping system consistent in both directions.
pub struct SyncEngine {
    store: MemStore,
    client: Arc<dyn ExternalClient>,
    cache: ReadViewCache,
    inflight: DashMap<SyncConfigId, ()>,
}

/// Removes the single-flight marker when a run finishes, however it ends.
struct InflightGuard<'a> {
    map: &'a DashMap<SyncConfigId, ()>,
    key: SyncConfigId,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.key);
    }
}

impl SyncEngine {
    /// Creates an engine over a store and a transport.
    #[must_use]
    pub fn new(store: MemStore, client: Arc<dyn ExternalClient>) -> Self {
        Self {
            store,
            client,
            cache: ReadViewCache::new(),
            inflight: DashMap::new(),
        }
    }

    /// The cached external read views.
    #[must_use]
    pub fn cache(&self) -> &ReadViewCache {
        &self.cache
    }

    /// Reads the configuration fresh from the store.
    #[must_use]
    pub fn config(&self) -> ExternalSyncConfig {
        SyncRepository::new(self.store.clone()).config()
    }

    /// Runs one synchronization attempt.
    ///
    /// A run record is opened before any work and closed at the end. Ledgers
    /// always import before vouchers, because voucher entries resolve
    /// against the materialized account set. Per-record failures are
    /// collected and the run still succeeds; transport/parse failures fail
    /// the whole run.
    ///
    /// # Errors
    ///
    /// Returns `Disabled` when the configuration has sync off and
    /// `AlreadySyncing` when another run holds the single-flight guard.
    /// Failures *during* a run are recorded on the returned run record, not
    /// surfaced as `Err`.
    pub async fn perform_sync(
        &self,
        direction: SyncDirection,
    ) -> Result<ExternalSyncRun, SyncError> {
        let config = self.config();
        if !config.sync_enabled {
            return Err(SyncError::Disabled);
        }

        let _guard = self.try_acquire(config.id)?;

        let runs = SyncRepository::new(self.store.clone());
        let mut run = ExternalSyncRun::start(direction);
        runs.record_run(&run);
        info!(run_id = %run.id, direction = ?direction, "sync run started");

        let mut processed: u64 = 0;
        let mut failures: Vec<RecordFailure> = Vec::new();

        let outcome = match direction {
            SyncDirection::Import => {
                self.import(&config, &mut processed, &mut failures).await
            }
            SyncDirection::Export => self.export(&config, &mut processed).await,
            SyncDirection::Bidirectional => {
                match self.import(&config, &mut processed, &mut failures).await {
                    Ok(()) => self.export(&config, &mut processed).await,
                    Err(err) => Err(err),
                }
            }
        };

        match outcome {
            Ok(()) => {
                run.succeed(processed, failures);
                info!(
                    run_id = %run.id,
                    records_processed = run.records_processed,
                    records_failed = run.records_failed,
                    "sync run finished"
                );
            }
            Err(err) => {
                warn!(run_id = %run.id, error = %err, "sync run failed");
                run.fail(err.to_string(), processed, failures);
            }
        }
        runs.record_run(&run);
        Ok(run)
    }

    /// Returns the cached external ledger view, fetching on a miss.
    ///
    /// # Errors
    ///
    /// Returns transport/parse errors from a cold fetch.
    pub async fn external_ledgers(&self) -> Result<Arc<Value>, SyncError> {
        self.external_view("ledgers").await
    }

    /// Returns the cached external voucher view, fetching on a miss.
    ///
    /// # Errors
    ///
    /// Returns transport/parse errors from a cold fetch.
    pub async fn external_vouchers(&self) -> Result<Arc<Value>, SyncError> {
        self.external_view("vouchers").await
    }

    /// Builds an export document and its download file name.
    ///
    /// A pure read: no run record is opened for downloads.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if serialization fails.
    pub fn export_document(&self, kind: ExportKind) -> Result<(String, String), SyncError> {
        let config = self.config();
        let (document, _, _) = self.build_export(&config, kind);
        let body = serialize_document(&document, &config.mapping)?;
        Ok((export_file_name(kind, Utc::now()), body))
    }

    /// Reacts to one push notification from the external system.
    ///
    /// Always invalidates the affected read view; additionally triggers a
    /// targeted import when the configuration is in real-time mode. A run
    /// already in flight simply wins: the event's effect is the cache
    /// invalidation.
    pub async fn handle_push_event(&self, event: PushEvent) -> Option<ExternalSyncRun> {
        debug!(kind = ?event.kind, identifier = %event.identifier, "push event received");
        self.cache.invalidate_scope(event.kind.cache_scope());

        let config = self.config();
        if !(config.sync_enabled && config.frequency == SyncFrequency::RealTime) {
            return None;
        }
        match self.perform_sync(SyncDirection::Import).await {
            Ok(run) => Some(run),
            Err(SyncError::AlreadySyncing) => {
                debug!("push-triggered sync skipped; run already in progress");
                None
            }
            Err(err) => {
                warn!(error = %err, "push-triggered sync could not start");
                None
            }
        }
    }

    fn try_acquire(&self, key: SyncConfigId) -> Result<InflightGuard<'_>, SyncError> {
        match self.inflight.entry(key) {
            Entry::Occupied(_) => Err(SyncError::AlreadySyncing),
            Entry::Vacant(vacant) => {
                vacant.insert(());
                Ok(InflightGuard {
                    map: &self.inflight,
                    key,
                })
            }
        }
    }

    async fn external_view(&self, scope: &str) -> Result<Arc<Value>, SyncError> {
        if let Some(view) = self.cache.get(scope) {
            return Ok(view);
        }
        let config = self.config();
        let raw = match scope {
            "ledgers" => self.client.fetch_ledgers(&config).await?,
            _ => self.client.fetch_vouchers(&config).await?,
        };
        let mut value: Value =
            serde_json::from_str(&raw).map_err(|e| SyncError::Parse(e.to_string()))?;
        config.mapping.apply_inbound(&mut value);
        let view = Arc::new(value);
        self.cache.insert(scope, Arc::clone(&view));
        Ok(view)
    }

    async fn import(
        &self,
        config: &ExternalSyncConfig,
        processed: &mut u64,
        failures: &mut Vec<RecordFailure>,
    ) -> Result<(), SyncError> {
        // Ledgers strictly before vouchers.
        let raw = self.client.fetch_ledgers(config).await?;
        let ledger_records = ledger_records(parse_document(&raw, &config.mapping)?);
        self.import_ledgers(config, &ledger_records, processed, failures);

        let raw = self.client.fetch_vouchers(config).await?;
        let voucher_records = voucher_records(parse_document(&raw, &config.mapping)?);
        self.import_vouchers(&voucher_records, processed, failures);

        Ok(())
    }

    fn import_ledgers(
        &self,
        config: &ExternalSyncConfig,
        records: &[LedgerRecord],
        processed: &mut u64,
        failures: &mut Vec<RecordFailure>,
    ) {
        let existing: Vec<ExistingAccount> = {
            let accounts = AccountRepository::new(self.store.clone()).list(false);
            accounts
                .into_iter()
                .map(|account| ExistingAccount {
                    id: account.id,
                    code: account.code,
                    name: account.name,
                    correlation_key: account.correlation_key,
                })
                .collect()
        };

        let plan = ImportService::plan_ledgers(records, &existing, config.update_existing);
        failures.extend(plan.failures);

        let repo = AccountRepository::new(self.store.clone());
        for (index, action) in plan.actions.into_iter().enumerate() {
            let identifier = ledger_action_identifier(&action);
            match repo.apply_ledger_action(action) {
                Ok(_) => *processed += 1,
                Err(err) => failures.push(RecordFailure {
                    record_index: index,
                    identifier,
                    error_code: err.error_code().to_string(),
                    message: err.to_string(),
                }),
            }
        }
    }

    fn import_vouchers(
        &self,
        records: &[VoucherRecord],
        processed: &mut u64,
        failures: &mut Vec<RecordFailure>,
    ) {
        let existing_keys: HashSet<String> = {
            let state_vouchers =
                VoucherRepository::new(self.store.clone()).list(&Default::default());
            state_vouchers
                .into_iter()
                .filter_map(|voucher| voucher.correlation_key)
                .collect()
        };

        let store = self.store.clone();
        let resolve = move |reference: &str| store.resolve_ledger(reference);
        let plan = ImportService::plan_vouchers(records, &existing_keys, resolve);
        failures.extend(plan.failures);

        let repo = VoucherRepository::new(self.store.clone());
        for (index, action) in plan.actions.into_iter().enumerate() {
            match action {
                VoucherAction::Insert(input) => match repo.create(input) {
                    Ok(_) => *processed += 1,
                    Err(err) => failures.push(RecordFailure {
                        record_index: index,
                        identifier: format!("record-{index}"),
                        error_code: err.error_code().to_string(),
                        message: err.to_string(),
                    }),
                },
                VoucherAction::Skip { .. } => *processed += 1,
            }
        }
    }

    async fn export(
        &self,
        config: &ExternalSyncConfig,
        processed: &mut u64,
    ) -> Result<(), SyncError> {
        let (document, account_count, voucher_count) =
            self.build_export(config, ExportKind::Full);
        let body = serialize_document(&document, &config.mapping)?;
        let file_name = export_file_name(ExportKind::Full, Utc::now());

        self.client
            .push_document(config, &file_name, body)
            .await?;
        *processed += account_count + voucher_count;
        Ok(())
    }

    fn build_export(
        &self,
        config: &ExternalSyncConfig,
        kind: ExportKind,
    ) -> (ExternalDocument, u64, u64) {
        let accounts = AccountRepository::new(self.store.clone()).list(false);
        let vouchers = VoucherRepository::new(self.store.clone()).list(&Default::default());

        let names: std::collections::HashMap<_, _> = accounts
            .iter()
            .map(|account| (account.id, account.name.clone()))
            .collect();
        let document = ExportService::document(
            kind,
            &accounts,
            &vouchers,
            &config.company,
            |account_id| names.get(&account_id).cloned(),
        );
        (document, accounts.len() as u64, vouchers.len() as u64)
    }
}

fn ledger_records(document: ExternalDocument) -> Vec<LedgerRecord> {
    match document {
        ExternalDocument::Ledgers(doc) => doc.records,
        ExternalDocument::Master(master) => master.ledgers,
        ExternalDocument::Vouchers(_) => Vec::new(),
    }
}

fn voucher_records(document: ExternalDocument) -> Vec<VoucherRecord> {
    match document {
        ExternalDocument::Vouchers(doc) => doc.records,
        ExternalDocument::Master(master) => master.vouchers,
        ExternalDocument::Ledgers(_) => Vec::new(),
    }
}

fn ledger_action_identifier(action: &LedgerAction) -> String {
    match action {
        LedgerAction::Insert(spec) => spec.name.clone(),
        LedgerAction::Update { spec, .. } => spec.name.clone(),
        LedgerAction::Attach {
            correlation_key, ..
        } => correlation_key.clone(),
        LedgerAction::Skip { id } => id.to_string(),
    }
}
