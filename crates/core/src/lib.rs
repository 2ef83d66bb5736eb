//! Core ledger logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here; the
//! persistence layer loads rows, calls into these modules and stores the result.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts rules and the default chart
//! - `fiscal` - Fiscal period windows and their open/closed/locked state machine
//! - `ledger` - Journal entry validation, lifecycle, numbering and reversal
//! - `reports` - Balances, general ledger, trial balance and financial statements
//! - `subledger` - Invoices, bills and payments, and their journal postings
//! - `reconciliation` - Bank statement import, reconciliation math and matching

pub mod accounts;
pub mod fiscal;
pub mod ledger;
pub mod reconciliation;
pub mod reports;
pub mod subledger;
