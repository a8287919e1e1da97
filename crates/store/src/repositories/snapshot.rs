//! Aging snapshot repository.

use chrono::NaiveDate;

use charak_core::receivables::{AgingSnapshot, SnapshotService};

use crate::mem::MemStore;

/// Repository for aging snapshots.
#[derive(Clone)]
pub struct SnapshotRepository {
    store: MemStore,
}

impl SnapshotRepository {
    /// Creates a new repository handle.
    #[must_use]
    pub const fn new(store: MemStore) -> Self {
        Self { store }
    }

    /// Buckets every open invoice as of the given date and appends an
    /// immutable snapshot.
    #[must_use]
    pub fn take(&self, as_of: NaiveDate) -> AgingSnapshot {
        let mut state = self.store.write();
        let invoices: Vec<_> = state.invoices.values().cloned().collect();
        let snapshot = SnapshotService::take_snapshot(&invoices, as_of);
        state.snapshots.push(snapshot.clone());
        snapshot
    }

    /// Returns the most recent `n` snapshots, newest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<AgingSnapshot> {
        let state = self.store.read();
        state.snapshots.iter().rev().take(n).cloned().collect()
    }
}
