//! Subledger error types.

use rust_decimal::Decimal;
use tally_shared::{AppError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

use super::types::{DocumentKind, DocumentStatus};
use crate::accounts::PostingRole;
use crate::ledger::LedgerError;

/// Errors raised by invoice, bill and payment operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubledgerError {
    // ========== Lookup Errors ==========
    /// Invoice or bill not found in the caller's company.
    #[error("{kind} not found: {id}")]
    DocumentNotFound {
        /// Document kind.
        kind: DocumentKind,
        /// Requested ID.
        id: Uuid,
    },

    /// Customer not found in the caller's company.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Supplier not found in the caller's company.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// Payment not found in the caller's company.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    // ========== Validation Errors ==========
    /// Name is empty.
    #[error("Name cannot be empty")]
    EmptyName,

    /// Currency code is not a three-letter ISO code.
    #[error("Invalid currency '{0}'")]
    InvalidCurrency(String),

    /// A document needs at least one line.
    #[error("Document must have at least one line")]
    NoLines,

    /// Line description is empty.
    #[error("Line {0}: description cannot be empty")]
    EmptyLineDescription(usize),

    /// Quantity is zero or negative.
    #[error("Line {0}: quantity must be positive")]
    InvalidQuantity(usize),

    /// Unit price is negative.
    #[error("Line {0}: unit price cannot be negative")]
    NegativePrice(usize),

    /// Tax rate outside 0..=100.
    #[error("Line {0}: tax rate must be between 0 and 100")]
    InvalidTaxRate(usize),

    /// The document total is zero.
    #[error("Document total must be greater than zero")]
    ZeroTotal,

    /// Due date falls before the issue date.
    #[error("Due date cannot be before the issue date")]
    DueBeforeIssue,

    /// Payment amount is zero or negative.
    #[error("Payment amount must be greater than zero")]
    NonPositivePayment,

    // ========== Business Rule Errors ==========
    /// Payment exceeds what is still owed.
    #[error("Payment of {amount} exceeds remaining balance of {remaining}")]
    Overpayment {
        /// Amount offered.
        amount: Decimal,
        /// Balance still owed.
        remaining: Decimal,
    },

    // ========== State Errors ==========
    /// The document's status does not allow the action.
    #[error("Cannot {action} a {status} document")]
    InvalidTransition {
        /// Current status.
        status: DocumentStatus,
        /// Attempted action.
        action: &'static str,
    },

    /// The document or payment already has a journal entry.
    #[error("Already posted to the ledger as journal entry {0}")]
    AlreadyPosted(Uuid),

    /// Another writer changed the document between read and write.
    #[error("{kind} {id} was modified concurrently, please retry")]
    VersionConflict {
        /// Document kind.
        kind: DocumentKind,
        /// Document ID.
        id: Uuid,
    },

    // ========== Reference Errors ==========
    /// No default account configured for a posting role.
    #[error("No {0} account configured for this company")]
    MissingPostingAccount(PostingRole),

    /// Payment references a bank account outside the company.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(Uuid),

    /// Posting through the journal failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SubledgerError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DocumentNotFound { .. }
            | Self::CustomerNotFound(_)
            | Self::SupplierNotFound(_)
            | Self::PaymentNotFound(_) => ErrorKind::NotFound,
            Self::EmptyName
            | Self::InvalidCurrency(_)
            | Self::NoLines
            | Self::EmptyLineDescription(_)
            | Self::InvalidQuantity(_)
            | Self::NegativePrice(_)
            | Self::InvalidTaxRate(_)
            | Self::ZeroTotal
            | Self::DueBeforeIssue
            | Self::NonPositivePayment => ErrorKind::ValidationFailed,
            Self::Overpayment { .. } => ErrorKind::BusinessRuleViolation,
            Self::InvalidTransition { .. } | Self::AlreadyPosted(_) => ErrorKind::StateConflict,
            Self::VersionConflict { .. } => ErrorKind::ConcurrencyConflict,
            Self::MissingPostingAccount(_) | Self::BankAccountNotFound(_) => {
                ErrorKind::ReferentialIntegrity
            }
            Self::Ledger(err) => err.kind(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::SupplierNotFound(_) => "SUPPLIER_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::EmptyName => "EMPTY_NAME",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::NoLines => "NO_LINES",
            Self::EmptyLineDescription(_) => "EMPTY_LINE_DESCRIPTION",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::NegativePrice(_) => "NEGATIVE_PRICE",
            Self::InvalidTaxRate(_) => "INVALID_TAX_RATE",
            Self::ZeroTotal => "ZERO_TOTAL",
            Self::DueBeforeIssue => "DUE_BEFORE_ISSUE",
            Self::NonPositivePayment => "NON_POSITIVE_PAYMENT",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::InvalidTransition { .. } => "INVALID_DOCUMENT_TRANSITION",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::VersionConflict { .. } => "CONCURRENT_MODIFICATION",
            Self::MissingPostingAccount(_) => "MISSING_POSTING_ACCOUNT",
            Self::BankAccountNotFound(_) => "BANK_ACCOUNT_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
        }
    }
}

impl From<SubledgerError> for AppError {
    fn from(err: SubledgerError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
