//! Common types used across the application.

pub mod balance;
pub mod id;
pub mod pagination;

pub use balance::{BalanceSide, SignedBalance};
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
