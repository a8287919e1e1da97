//! Transport to the external bookkeeping system.

use async_trait::async_trait;

use charak_core::sync::{ExternalSyncConfig, SyncError};

/// Fetches and pushes raw documents.
///
/// The engine owns parsing and mapping; implementations only move bytes, so
/// tests can swap in an in-memory client.
#[async_trait]
pub trait ExternalClient: Send + Sync {
    /// Fetches the external ledger (account) document.
    async fn fetch_ledgers(&self, config: &ExternalSyncConfig) -> Result<String, SyncError>;

    /// Fetches the external voucher document.
    async fn fetch_vouchers(&self, config: &ExternalSyncConfig) -> Result<String, SyncError>;

    /// Pushes an export document.
    async fn push_document(
        &self,
        config: &ExternalSyncConfig,
        file_name: &str,
        body: String,
    ) -> Result<(), SyncError>;
}

/// HTTP implementation over the external system's REST endpoint.
pub struct HttpExternalClient {
    http: reqwest::Client,
}

impl HttpExternalClient {
    /// Creates a client with sane timeouts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    async fn fetch(&self, config: &ExternalSyncConfig, path: &str) -> Result<String, SyncError> {
        let url = format!("{}{path}", config.base_url());
        let response = self
            .http
            .get(&url)
            .query(&[("company", config.company.as_str())])
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))
    }
}

impl Default for HttpExternalClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExternalClient for HttpExternalClient {
    async fn fetch_ledgers(&self, config: &ExternalSyncConfig) -> Result<String, SyncError> {
        self.fetch(config, "/ledgers").await
    }

    async fn fetch_vouchers(&self, config: &ExternalSyncConfig) -> Result<String, SyncError> {
        self.fetch(config, "/vouchers").await
    }

    async fn push_document(
        &self,
        config: &ExternalSyncConfig,
        file_name: &str,
        body: String,
    ) -> Result<(), SyncError> {
        let url = format!("{}/import", config.base_url());
        self.http
            .post(&url)
            .query(&[("company", config.company.as_str())])
            .header("X-File-Name", file_name)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        Ok(())
    }
}
