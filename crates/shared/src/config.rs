//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// External bookkeeping system defaults.
    pub external: ExternalConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// External bookkeeping system connection defaults.
///
/// These values seed the sync configuration row on first start; after that
/// the row is edited through the API and re-read at the start of every run.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalConfig {
    /// External system host.
    #[serde(default = "default_external_host")]
    pub host: String,
    /// External system port.
    #[serde(default = "default_external_port")]
    pub port: u16,
    /// Company identifier in the external system.
    #[serde(default)]
    pub company: String,
    /// Whether background synchronization is enabled.
    #[serde(default)]
    pub sync_enabled: bool,
    /// Sync frequency: `manual`, `hourly`, `daily` or `real-time`.
    #[serde(default = "default_frequency")]
    pub sync_frequency: String,
    /// Whether re-imports overwrite previously imported fields.
    #[serde(default)]
    pub update_existing: bool,
}

fn default_external_host() -> String {
    "localhost".to_string()
}

fn default_external_port() -> u16 {
    9000
}

fn default_frequency() -> String {
    "manual".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CHARAK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
