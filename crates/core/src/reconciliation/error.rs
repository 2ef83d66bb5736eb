//! Reconciliation error types.

use rust_decimal::Decimal;
use tally_shared::{AppError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by bank account, import and reconciliation operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconciliationError {
    // ========== Lookup Errors ==========
    /// Bank account not found in the caller's company.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(Uuid),

    /// Reconciliation not found in the caller's company.
    #[error("Reconciliation not found: {0}")]
    ReconciliationNotFound(Uuid),

    /// Bank transaction not found in the caller's company.
    #[error("Bank transaction not found: {0}")]
    TransactionNotFound(Uuid),

    // ========== Validation Errors ==========
    /// Bank account name is empty.
    #[error("Bank account name cannot be empty")]
    EmptyName,

    /// Currency code is not a three-letter ISO code.
    #[error("Invalid currency '{0}'")]
    InvalidCurrency(String),

    /// Import batch identifier is empty.
    #[error("Import batch identifier cannot be empty")]
    EmptyBatchId,

    /// The statement has no lines.
    #[error("Statement import must contain at least one line")]
    EmptyStatement,

    /// A statement line breaks the debit/credit rules.
    #[error("Statement line {line}: {reason}")]
    InvalidStatementLine {
        /// 1-based line position.
        line: usize,
        /// What is wrong.
        reason: &'static str,
    },

    // ========== Reference Errors ==========
    /// The linked GL account is missing, inactive, foreign or not an asset.
    #[error("Account {0} must be an active asset account of this company")]
    InvalidGlAccount(Uuid),

    /// The journal entry is missing, foreign or not yet posted.
    #[error("Journal entry {0} is not a posted entry of this company")]
    EntryNotLinkable(Uuid),

    /// The transaction belongs to another bank account.
    #[error("Transaction {0} does not belong to the reconciled bank account")]
    WrongBankAccount(Uuid),

    // ========== State Errors ==========
    /// The batch was already imported for this bank account.
    #[error("Import batch '{0}' has already been imported")]
    DuplicateBatch(String),

    /// Another reconciliation is still open for the bank account.
    #[error("Reconciliation {0} is already in progress for this bank account")]
    AlreadyInProgress(Uuid),

    /// The reconciliation has been completed.
    #[error("Reconciliation {0} is completed")]
    ReconciliationCompleted(Uuid),

    /// The transaction is already matched.
    #[error("Bank transaction {0} is already reconciled")]
    AlreadyReconciled(Uuid),

    /// The transaction is not matched.
    #[error("Bank transaction {0} is not reconciled")]
    NotReconciled(Uuid),

    /// Unmatched transactions remain on or before the statement date.
    #[error("Cannot complete: {0} unreconciled transactions remain")]
    UnreconciledRemaining(u64),

    /// Statement and adjusted ledger balance disagree.
    #[error("Cannot complete: difference of {0} is not resolved")]
    DifferenceNotResolved(Decimal),
}

impl ReconciliationError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BankAccountNotFound(_)
            | Self::ReconciliationNotFound(_)
            | Self::TransactionNotFound(_) => ErrorKind::NotFound,
            Self::EmptyName
            | Self::InvalidCurrency(_)
            | Self::EmptyBatchId
            | Self::EmptyStatement
            | Self::InvalidStatementLine { .. } => ErrorKind::ValidationFailed,
            Self::InvalidGlAccount(_) | Self::EntryNotLinkable(_) | Self::WrongBankAccount(_) => {
                ErrorKind::ReferentialIntegrity
            }
            Self::DuplicateBatch(_)
            | Self::AlreadyInProgress(_)
            | Self::ReconciliationCompleted(_)
            | Self::AlreadyReconciled(_)
            | Self::NotReconciled(_)
            | Self::UnreconciledRemaining(_)
            | Self::DifferenceNotResolved(_) => ErrorKind::StateConflict,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::ReconciliationNotFound(_) => "RECONCILIATION_NOT_FOUND",
            Self::TransactionNotFound(_) => "BANK_TRANSACTION_NOT_FOUND",
            Self::EmptyName => "EMPTY_NAME",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::EmptyBatchId => "EMPTY_BATCH_ID",
            Self::EmptyStatement => "EMPTY_STATEMENT",
            Self::InvalidStatementLine { .. } => "INVALID_STATEMENT_LINE",
            Self::InvalidGlAccount(_) => "INVALID_GL_ACCOUNT",
            Self::EntryNotLinkable(_) => "ENTRY_NOT_LINKABLE",
            Self::WrongBankAccount(_) => "WRONG_BANK_ACCOUNT",
            Self::DuplicateBatch(_) => "DUPLICATE_BATCH",
            Self::AlreadyInProgress(_) => "RECONCILIATION_IN_PROGRESS",
            Self::ReconciliationCompleted(_) => "RECONCILIATION_COMPLETED",
            Self::AlreadyReconciled(_) => "ALREADY_RECONCILED",
            Self::NotReconciled(_) => "NOT_RECONCILED",
            Self::UnreconciledRemaining(_) => "UNRECONCILED_TRANSACTIONS",
            Self::DifferenceNotResolved(_) => "DIFFERENCE_NOT_RESOLVED",
        }
    }
}

impl From<ReconciliationError> for AppError {
    fn from(err: ReconciliationError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
