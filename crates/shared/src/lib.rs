//! Shared types, errors, and configuration for Charak.
//!
//! This crate provides common types used across all other crates:
//! - Signed balance types for debit/credit arithmetic
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
