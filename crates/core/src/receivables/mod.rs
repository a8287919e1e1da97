//! Outstanding invoices and aging.
//!
//! Derives per-invoice outstanding amounts and bucketed aging snapshots from
//! the invoice set and payment allocations. Snapshots are immutable; a new
//! reporting run appends a new snapshot instead of mutating history.

pub mod aging;
pub mod invoice;
pub mod snapshot;

#[cfg(test)]
mod aging_props;

pub use aging::AgingBucket;
pub use invoice::{OutstandingInvoice, RecordInvoiceInput};
pub use snapshot::{AgingSnapshot, PatientAgingRow, SnapshotService};
