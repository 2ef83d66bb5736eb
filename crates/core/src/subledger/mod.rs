//! Receivables and payables subledgers.
//!
//! Invoices, bills and payments are business documents, not ledger entries.
//! This module computes their totals, guards their lifecycle and payment
//! application, and builds the journal lines that post them to the ledger.

pub mod error;
pub mod lifecycle;
pub mod payments;
pub mod posting;
pub mod totals;
pub mod types;

#[cfg(test)]
mod payments_props;

pub use error::SubledgerError;
pub use lifecycle::{cancel, ensure_postable, is_overdue, issue};
pub use payments::{PaymentOutcome, apply_payment, remaining, settlement_status};
pub use posting::{PostingDraft, bill_posting, invoice_posting, payment_posting};
pub use totals::compute_lines;
pub use types::{
    ComputedLine, DocumentKind, DocumentLineInput, DocumentStatus, DocumentTotals, PartyKind,
    PaymentMethod, PostingAccounts,
};
