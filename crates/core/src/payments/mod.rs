//! Payment transactions and allocations.
//!
//! Payments are recorded per patient and fanned out over outstanding
//! invoices. Every allocation is posted as a receipt voucher so the
//! double-entry invariant stays uniform across the whole system.

pub mod error;
pub mod service;
pub mod types;

pub use error::PaymentError;
pub use service::PaymentService;
pub use types::{
    PaymentAllocation, PaymentMode, PaymentStatus, PaymentTransaction, RecordPaymentInput,
};
