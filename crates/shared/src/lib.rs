//! Shared types, errors, and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with decimal precision and the ledger-wide tolerance
//! - Typed IDs and the tenant/company scope every query is bound to
//! - Pagination types for list operations
//! - The caller-facing error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
