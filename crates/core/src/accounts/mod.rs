//! Chart of accounts domain types.
//!
//! Accounts carry no materialized balance; balances are computed on demand by
//! summing posted voucher entries, so the entry history stays the single
//! source of truth.

pub mod types;

pub use types::{Account, AccountType, ComputedBalance, NewAccount};
