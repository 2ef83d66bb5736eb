//! Chart of accounts errors.

use tally_shared::{AppError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by chart-of-accounts operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    /// Account not found in the caller's company.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Account code already exists in the company.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account code is empty or malformed.
    #[error("Invalid account code '{0}'")]
    InvalidCode(String),

    /// Account name is empty.
    #[error("Account name cannot be empty")]
    EmptyName,

    /// Currency code is not a three-letter ISO code.
    #[error("Invalid currency '{0}'")]
    InvalidCurrency(String),

    /// Parent account does not exist.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account belongs to a different tenant or company.
    #[error("Parent account {0} belongs to a different company")]
    ParentWrongCompany(Uuid),

    /// Setting the parent would make the account its own ancestor.
    #[error("Parent {0} would create a cycle in the account hierarchy")]
    ParentCycle(Uuid),

    /// System accounts cannot be edited or deleted.
    #[error("Account {0} is a system account and cannot be changed")]
    SystemAccountLocked(Uuid),

    /// Account has journal lines.
    #[error("Cannot delete account {account_id}: it has {count} journal lines")]
    HasJournalLines {
        /// The account ID.
        account_id: Uuid,
        /// Number of journal lines referencing it.
        count: u64,
    },

    /// Account has child accounts.
    #[error("Cannot delete account {account_id}: it has {count} child accounts")]
    HasChildren {
        /// The account ID.
        account_id: Uuid,
        /// Number of children.
        count: u64,
    },

    /// Account type cannot change once lines reference the account.
    #[error("Cannot change type of account {0} because it has journal lines")]
    TypeChangeNotAllowed(Uuid),
}

impl AccountError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateCode(_) => ErrorKind::StateConflict,
            Self::InvalidCode(_) | Self::EmptyName | Self::InvalidCurrency(_) => {
                ErrorKind::ValidationFailed
            }
            Self::ParentNotFound(_) | Self::ParentWrongCompany(_) | Self::ParentCycle(_) => {
                ErrorKind::ReferentialIntegrity
            }
            Self::SystemAccountLocked(_)
            | Self::HasJournalLines { .. }
            | Self::HasChildren { .. }
            | Self::TypeChangeNotAllowed(_) => ErrorKind::BusinessRuleViolation,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::InvalidCode(_) => "INVALID_ACCOUNT_CODE",
            Self::EmptyName => "EMPTY_ACCOUNT_NAME",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::ParentWrongCompany(_) => "PARENT_WRONG_COMPANY",
            Self::ParentCycle(_) => "PARENT_CYCLE",
            Self::SystemAccountLocked(_) => "SYSTEM_ACCOUNT_LOCKED",
            Self::HasJournalLines { .. } => "ACCOUNT_HAS_LINES",
            Self::HasChildren { .. } => "ACCOUNT_HAS_CHILDREN",
            Self::TypeChangeNotAllowed(_) => "ACCOUNT_TYPE_CHANGE_NOT_ALLOWED",
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
