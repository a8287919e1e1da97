//! External bookkeeping system synchronization: pure parts.
//!
//! This module holds everything about sync that needs no I/O:
//! - The external document model (tagged union of ledger/voucher/master docs)
//! - Field-name mapping rules and the JSON codec applying them
//! - Export builders (pure transforms of internal state)
//! - Import planning with correlation-key identity resolution
//! - Sync run records and their state machine
//! - Push event types
//!
//! The driver that talks to the network, schedules runs and holds the
//! single-flight guard lives in the store crate.

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod export;
pub mod import;
pub mod mapping;
pub mod run;

#[cfg(test)]
mod import_props;

pub use codec::{export_file_name, parse_document, serialize_document};
pub use config::{ExternalSyncConfig, SyncFrequency};
pub use document::{
    EntryRecord, ExternalDocument, LedgerDocument, LedgerRecord, MasterDocument, VoucherDocument,
    VoucherRecord,
};
pub use error::SyncError;
pub use events::{PushEvent, PushEventKind};
pub use export::{ExportKind, ExportService};
pub use import::{
    AccountSpec, ExistingAccount, ImportService, LedgerAction, LedgerImportPlan, RecordFailure,
    VoucherAction, VoucherImportPlan,
};
pub use mapping::{FieldMapping, MappingRule};
pub use run::{ExternalSyncRun, SyncDirection, SyncRunStatus};
