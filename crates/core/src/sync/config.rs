//! Sync configuration entity.
//!
//! Modeled as one normal entity row rather than global mutable state, so the
//! engine re-reads it at the start of every run and tests can swap
//! configurations without process restarts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use charak_shared::config::ExternalConfig;
use charak_shared::types::SyncConfigId;

use super::mapping::FieldMapping;

/// How often the engine runs on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncFrequency {
    /// Only when triggered manually.
    Manual,
    /// Once an hour.
    Hourly,
    /// Once a day.
    Daily,
    /// Every 30 seconds, plus push-triggered targeted re-syncs.
    RealTime,
}

impl SyncFrequency {
    /// Returns the timer interval for scheduled runs, if any.
    #[must_use]
    pub const fn poll_interval(self) -> Option<Duration> {
        match self {
            Self::Manual => None,
            Self::Hourly => Some(Duration::from_secs(3600)),
            Self::Daily => Some(Duration::from_secs(86_400)),
            Self::RealTime => Some(Duration::from_secs(30)),
        }
    }
}

impl std::str::FromStr for SyncFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "real-time" | "realtime" => Ok(Self::RealTime),
            _ => Err(format!("Unknown sync frequency: {s}")),
        }
    }
}

/// Connection and behavior settings for the external bookkeeping system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalSyncConfig {
    /// Configuration identity; the single-flight guard is keyed on it.
    pub id: SyncConfigId,
    /// External system host.
    pub host: String,
    /// External system port.
    pub port: u16,
    /// Company identifier in the external system.
    pub company: String,
    /// Whether synchronization runs at all.
    pub sync_enabled: bool,
    /// How often scheduled runs fire.
    pub frequency: SyncFrequency,
    /// Whether re-imports overwrite previously imported fields.
    pub update_existing: bool,
    /// Field-name mapping between the two systems.
    pub mapping: FieldMapping,
}

impl ExternalSyncConfig {
    /// Seeds a configuration row from application config defaults.
    #[must_use]
    pub fn from_defaults(defaults: &ExternalConfig) -> Self {
        Self {
            id: SyncConfigId::new(),
            host: defaults.host.clone(),
            port: defaults.port,
            company: defaults.company.clone(),
            sync_enabled: defaults.sync_enabled,
            frequency: defaults
                .sync_frequency
                .parse()
                .unwrap_or(SyncFrequency::Manual),
            update_existing: defaults.update_existing,
            mapping: FieldMapping::default(),
        }
    }

    /// Base URL of the external system's HTTP endpoint.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
