//! Per-patient running balances.
//!
//! One ledger row exists per (patient, account) pair, created lazily the
//! first time a patient incurs a financial event. The materialized balance
//! is a cache: it must always equal the result of replaying the full posted
//! entry history, and a repair routine re-derives it.

pub mod service;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use service::{LedgerEvent, PatientLedgerService};
pub use types::PatientLedger;
