//! Repository abstractions over the shared store.
//!
//! Each repository is a thin cloneable handle; the interesting rules live in
//! `charak-core` and are enforced here at the persistence boundary.

pub mod account;
pub mod invoice;
pub mod patient_ledger;
pub mod payment;
pub mod settings;
pub mod snapshot;
pub mod sync;
pub mod voucher;

pub use account::AccountRepository;
pub use invoice::{InvoiceFilter, InvoiceRepository};
pub use patient_ledger::{PatientLedgerRepository, RepairOutcome};
pub use payment::PaymentRepository;
pub use settings::SettingsRepository;
pub use snapshot::SnapshotRepository;
pub use sync::{SyncConfigUpdate, SyncRepository};
pub use voucher::{VoucherFilter, VoucherRepository};
