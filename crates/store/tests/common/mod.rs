//! Shared helpers for store integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use charak_core::sync::{ExternalSyncConfig, SyncError, SyncFrequency};
use charak_shared::config::ExternalConfig;
use charak_store::MemStore;
use charak_store::repositories::{SyncConfigUpdate, SyncRepository};
use charak_store::sync::ExternalClient;

/// Builds a store with sync enabled at the given frequency.
pub fn make_store(sync_enabled: bool, frequency: SyncFrequency) -> MemStore {
    let store = MemStore::new(ExternalSyncConfig::from_defaults(&ExternalConfig {
        host: "localhost".to_string(),
        port: 9000,
        company: "City Hospital".to_string(),
        sync_enabled: false,
        sync_frequency: "manual".to_string(),
        update_existing: false,
    }));
    SyncRepository::new(store.clone()).update_config(SyncConfigUpdate {
        sync_enabled: Some(sync_enabled),
        frequency: Some(frequency),
        ..SyncConfigUpdate::default()
    });
    store
}

/// In-memory transport serving fixed documents and recording pushes.
pub struct MockClient {
    /// Raw ledger document to serve.
    pub ledgers: String,
    /// Raw voucher document to serve.
    pub vouchers: String,
    /// Documents pushed by exports: (file name, body).
    pub pushed: Mutex<Vec<(String, String)>>,
    /// When set, every call fails with a transport error.
    pub fail_transport: bool,
}

impl MockClient {
    pub fn new(ledgers: &str, vouchers: &str) -> Arc<Self> {
        Arc::new(Self {
            ledgers: ledgers.to_string(),
            vouchers: vouchers.to_string(),
            pushed: Mutex::new(Vec::new()),
            fail_transport: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            ledgers: String::new(),
            vouchers: String::new(),
            pushed: Mutex::new(Vec::new()),
            fail_transport: true,
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(
            r#"{"kind":"ledgers","records":[]}"#,
            r#"{"kind":"vouchers","records":[]}"#,
        )
    }
}

#[async_trait]
impl ExternalClient for MockClient {
    async fn fetch_ledgers(&self, _config: &ExternalSyncConfig) -> Result<String, SyncError> {
        if self.fail_transport {
            return Err(SyncError::Transport("connection refused".to_string()));
        }
        Ok(self.ledgers.clone())
    }

    async fn fetch_vouchers(&self, _config: &ExternalSyncConfig) -> Result<String, SyncError> {
        if self.fail_transport {
            return Err(SyncError::Transport("connection refused".to_string()));
        }
        Ok(self.vouchers.clone())
    }

    async fn push_document(
        &self,
        _config: &ExternalSyncConfig,
        file_name: &str,
        body: String,
    ) -> Result<(), SyncError> {
        if self.fail_transport {
            return Err(SyncError::Transport("connection refused".to_string()));
        }
        self.pushed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((file_name.to_string(), body));
        Ok(())
    }
}
