//! Double-entry voucher bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Voucher and entry domain types
//! - Business rule validation (the double-entry invariant)
//! - Voucher number formatting
//! - Voucher service for pre-persistence validation
//! - Contra vouchers for reversing posted vouchers
//! - Error types for ledger operations

pub mod contra;
pub mod error;
pub mod numbering;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use contra::ContraService;
pub use error::LedgerError;
pub use numbering::format_number;
pub use service::{AccountStatus, PreparedVoucher, VoucherService};
pub use types::{
    CreateVoucherInput, EntryInput, EntryTarget, Voucher, VoucherEntry, VoucherStatus,
    VoucherTotals, VoucherType,
};
pub use validation::validate_entries;
