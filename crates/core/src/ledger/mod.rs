//! Double-entry journal.
//!
//! This module implements the pure half of the journal ledger:
//! - Entry and line types
//! - Line validation (exclusive sides, balance within tolerance)
//! - Lifecycle guards for update, post, reverse and delete
//! - Document numbering (`PREFIX-YYYY-NNNNN`)
//! - Construction of mirror entries for reversal

pub mod error;
pub mod numbering;
pub mod reversal;
pub mod rules;
pub mod types;
pub mod validation;

#[cfg(test)]
mod numbering_props;
#[cfg(test)]
mod reversal_props;
#[cfg(test)]
mod validation_props;

pub use error::LedgerError;
pub use numbering::{DocumentPrefix, format_number, max_sequence, parse_sequence};
pub use reversal::{ReversalDraft, build_reversal};
pub use rules::{
    check_accounts, ensure_deletable, ensure_editable, ensure_postable, ensure_reversible,
};
pub use types::{
    JournalEntryStatus, JournalEntryType, JournalLineInput, LineTotals, PreparedLine,
};
pub use validation::{prepare_lines, validate_lines};
