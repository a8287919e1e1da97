//! Sync run records.
//!
//! A run row is created at the start of every attempt and closed at the end;
//! the most recent running row doubles as the mutual-exclusion token. Runs
//! are queryable history, so failures carry counts and per-record details,
//! not just a boolean.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use charak_shared::types::SyncRunId;

use super::import::RecordFailure;

/// Which way a run moves data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    /// External system into the internal ledger.
    Import,
    /// Internal ledger out to the external system.
    Export,
    /// Import, then export.
    Bidirectional,
}

/// Lifecycle status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncRunStatus {
    /// In flight; blocks new runs.
    Running,
    /// Finished; per-record failures may still be present.
    Success,
    /// Transport or parse failure aborted the run.
    Failed,
}

/// One synchronization attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalSyncRun {
    /// Unique identifier.
    pub id: SyncRunId,
    /// Which way data moved.
    pub direction: SyncDirection,
    /// Lifecycle status.
    pub status: SyncRunStatus,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished, once it has.
    pub finished_at: Option<DateTime<Utc>>,
    /// Records processed successfully.
    pub records_processed: u64,
    /// Records that failed.
    pub records_failed: u64,
    /// Per-record failure details.
    pub failures: Vec<RecordFailure>,
    /// Run-level error for failed runs.
    pub error: Option<String>,
}

impl ExternalSyncRun {
    /// Opens a new running record.
    #[must_use]
    pub fn start(direction: SyncDirection) -> Self {
        Self {
            id: SyncRunId::new(),
            direction,
            status: SyncRunStatus::Running,
            started_at: Utc::now(),
            finished_at: None,
            records_processed: 0,
            records_failed: 0,
            failures: Vec::new(),
            error: None,
        }
    }

    /// Closes the run as successful.
    ///
    /// A run with per-record failures still counts as `Success`; only
    /// transport/parse problems fail a whole run.
    pub fn succeed(&mut self, records_processed: u64, failures: Vec<RecordFailure>) {
        self.status = SyncRunStatus::Success;
        self.records_processed = records_processed;
        self.records_failed = failures.len() as u64;
        self.failures = failures;
        self.finished_at = Some(Utc::now());
    }

    /// Closes the run as failed.
    pub fn fail(&mut self, error: String, records_processed: u64, failures: Vec<RecordFailure>) {
        self.status = SyncRunStatus::Failed;
        self.records_processed = records_processed;
        self.records_failed = failures.len() as u64;
        self.failures = failures;
        self.error = Some(error);
        self.finished_at = Some(Utc::now());
    }

    /// Returns true while the run holds the single-flight token.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == SyncRunStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_lifecycle_success() {
        let mut run = ExternalSyncRun::start(SyncDirection::Import);
        assert!(run.is_running());
        assert!(run.finished_at.is_none());

        run.succeed(10, vec![]);
        assert_eq!(run.status, SyncRunStatus::Success);
        assert_eq!(run.records_processed, 10);
        assert_eq!(run.records_failed, 0);
        assert!(run.finished_at.is_some());
        assert!(!run.is_running());
    }

    #[test]
    fn test_run_success_with_record_failures() {
        let mut run = ExternalSyncRun::start(SyncDirection::Import);
        run.succeed(
            8,
            vec![RecordFailure {
                record_index: 3,
                identifier: "L-9".to_string(),
                error_code: "UNKNOWN_ACCOUNT_TYPE".to_string(),
                message: "Unknown account type: galaxy".to_string(),
            }],
        );
        assert_eq!(run.status, SyncRunStatus::Success);
        assert_eq!(run.records_failed, 1);
    }

    #[test]
    fn test_run_lifecycle_failed() {
        let mut run = ExternalSyncRun::start(SyncDirection::Export);
        run.fail("connection refused".to_string(), 0, vec![]);
        assert_eq!(run.status, SyncRunStatus::Failed);
        assert_eq!(run.error.as_deref(), Some("connection refused"));
        assert!(run.finished_at.is_some());
    }
}
