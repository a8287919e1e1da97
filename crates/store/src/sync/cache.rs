//! Cached read views of the external system.
//!
//! Push events invalidate these views; a full re-sync is not required just
//! to keep reads fresh.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use serde_json::Value;

/// Default cache capacity (number of views).
const DEFAULT_CACHE_CAPACITY: u64 = 16;

/// Default time-to-live for cached views (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache of parsed external documents, keyed by scope ("ledgers"/"vouchers").
#[derive(Clone)]
pub struct ReadViewCache {
    cache: Cache<String, Arc<Value>>,
}

impl ReadViewCache {
    /// Creates a cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { cache }
    }

    /// Returns the cached view for a scope, if fresh.
    #[must_use]
    pub fn get(&self, scope: &str) -> Option<Arc<Value>> {
        self.cache.get(scope)
    }

    /// Stores a view.
    pub fn insert(&self, scope: &str, view: Arc<Value>) {
        self.cache.insert(scope.to_string(), view);
    }

    /// Drops the view for one scope.
    pub fn invalidate_scope(&self, scope: &str) {
        self.cache.invalidate(scope);
    }

    /// Drops every view.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of views currently cached.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl Default for ReadViewCache {
    fn default() -> Self {
        Self::new()
    }
}
