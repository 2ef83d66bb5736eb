//! Ledger error types for validation and state errors.

use rust_decimal::Decimal;
use tally_shared::{AppError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

use super::types::JournalEntryStatus;
use crate::fiscal::FiscalError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// An entry needs at least two lines.
    #[error("Journal entry must have at least 2 lines, got {0}")]
    InsufficientLines(usize),

    /// Debits and credits disagree by a cent or more.
    #[error("Debits: {debit}, Credits: {credit}")]
    Unbalanced {
        /// Total debits.
        debit: Decimal,
        /// Total credits.
        credit: Decimal,
    },

    /// A line carries a negative amount.
    #[error("Line {0}: amounts cannot be negative")]
    NegativeAmount(usize),

    /// A line carries both a debit and a credit.
    #[error("Line {0}: a line cannot have both debit and credit")]
    BothSides(usize),

    /// A line carries neither a debit nor a credit.
    #[error("Line {0}: a line must have either a debit or a credit")]
    ZeroLine(usize),

    /// Entry description is empty.
    #[error("Journal entry description cannot be empty")]
    EmptyDescription,

    // ========== Reference Errors ==========
    /// Entry not found in the caller's company.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// A line references an account that does not exist in the company.
    #[error("Account {0} not found in this company")]
    AccountNotInScope(Uuid),

    /// A line references an inactive account.
    #[error("Account {0} is inactive")]
    AccountInactive(Uuid),

    /// Fiscal period resolution or gating failed.
    #[error(transparent)]
    Period(#[from] FiscalError),

    // ========== State Errors ==========
    /// Only draft entries can be updated.
    #[error("Cannot modify a {0} journal entry")]
    CannotModify(JournalEntryStatus),

    /// Only draft entries can be posted.
    #[error("Cannot post a {0} journal entry")]
    CannotPost(JournalEntryStatus),

    /// Only posted entries can be reversed.
    #[error("Cannot reverse a {0} journal entry")]
    CannotReverse(JournalEntryStatus),

    /// The entry already has a reversal.
    #[error("Journal entry {0} has already been reversed")]
    AlreadyReversed(Uuid),

    /// Only draft entries can be deleted.
    #[error("Cannot delete a {0} journal entry")]
    CannotDelete(JournalEntryStatus),

    // ========== Concurrency Errors ==========
    /// The number sequence stayed contended after every retry.
    #[error("Number sequence {scope} is busy after {attempts} attempts, please retry")]
    SequenceContention {
        /// Sequence scope, e.g. `JE-2026`.
        scope: String,
        /// Attempts made.
        attempts: u32,
    },
}

impl LedgerError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientLines(_)
            | Self::Unbalanced { .. }
            | Self::NegativeAmount(_)
            | Self::BothSides(_)
            | Self::ZeroLine(_)
            | Self::EmptyDescription => ErrorKind::ValidationFailed,
            Self::EntryNotFound(_) => ErrorKind::NotFound,
            Self::AccountNotInScope(_) | Self::AccountInactive(_) => {
                ErrorKind::ReferentialIntegrity
            }
            Self::Period(err) => err.kind(),
            Self::CannotModify(_)
            | Self::CannotPost(_)
            | Self::CannotReverse(_)
            | Self::AlreadyReversed(_)
            | Self::CannotDelete(_) => ErrorKind::StateConflict,
            Self::SequenceContention { .. } => ErrorKind::ConcurrencyConflict,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines(_) => "INSUFFICIENT_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::NegativeAmount(_) => "NEGATIVE_AMOUNT",
            Self::BothSides(_) => "DEBIT_AND_CREDIT",
            Self::ZeroLine(_) => "ZERO_AMOUNT_LINE",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AccountNotInScope(_) => "ACCOUNT_NOT_IN_SCOPE",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::Period(err) => err.error_code(),
            Self::CannotModify(_) => "ENTRY_NOT_EDITABLE",
            Self::CannotPost(_) => "ENTRY_NOT_POSTABLE",
            Self::CannotReverse(_) => "ENTRY_NOT_REVERSIBLE",
            Self::AlreadyReversed(_) => "ENTRY_ALREADY_REVERSED",
            Self::CannotDelete(_) => "ENTRY_NOT_DELETABLE",
            Self::SequenceContention { .. } => "SEQUENCE_CONTENTION",
        }
    }

    /// Returns true if retrying the operation unchanged may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
