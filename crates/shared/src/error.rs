//! Application-wide error types.
//!
//! Every domain error in the workspace classifies itself into an [`ErrorKind`]
//! and converts into [`AppError`], so callers can distinguish failures without
//! matching on module-specific enums.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Classification of ledger failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Entity absent or outside the caller's tenant scope.
    NotFound,
    /// Input rejected before touching state (imbalance, bad amounts, missing lines).
    ValidationFailed,
    /// The entity's current state forbids the operation.
    StateConflict,
    /// A referenced entity is missing, inactive or belongs to another company.
    ReferentialIntegrity,
    /// A business rule such as an overpayment or a guarded deletion.
    BusinessRuleViolation,
    /// A concurrent writer won a compare-and-swap; safe to retry.
    ConcurrencyConflict,
    /// Storage or unexpected internal failure.
    Internal,
}

impl ErrorKind {
    /// Returns true if the operation may succeed when retried unchanged.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::ConcurrencyConflict)
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// State conflict (e.g., posting an already posted entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referential integrity failure.
    #[error("Referential integrity violation: {0}")]
    Referential(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Concurrent modification, retryable.
    #[error("Concurrent modification: {0}")]
    Concurrency(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds an `AppError` of the given kind carrying `message`.
    #[must_use]
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::ValidationFailed => Self::Validation(message),
            ErrorKind::StateConflict => Self::Conflict(message),
            ErrorKind::ReferentialIntegrity => Self::Referential(message),
            ErrorKind::BusinessRuleViolation => Self::BusinessRule(message),
            ErrorKind::ConcurrencyConflict => Self::Concurrency(message),
            ErrorKind::Internal => Self::Internal(message),
        }
    }

    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::ValidationFailed,
            Self::Conflict(_) => ErrorKind::StateConflict,
            Self::Referential(_) => ErrorKind::ReferentialIntegrity,
            Self::BusinessRule(_) => ErrorKind::BusinessRuleViolation,
            Self::Concurrency(_) => ErrorKind::ConcurrencyConflict,
            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::Referential(_) => 400,
            Self::Conflict(_) | Self::Concurrency(_) => 409,
            Self::BusinessRule(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "STATE_CONFLICT",
            Self::Referential(_) => "REFERENTIAL_INTEGRITY",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Concurrency(_) => "CONCURRENT_MODIFICATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::NotFound, 404, "NOT_FOUND")]
    #[case(ErrorKind::ValidationFailed, 400, "VALIDATION_ERROR")]
    #[case(ErrorKind::StateConflict, 409, "STATE_CONFLICT")]
    #[case(ErrorKind::ReferentialIntegrity, 400, "REFERENTIAL_INTEGRITY")]
    #[case(ErrorKind::BusinessRuleViolation, 422, "BUSINESS_RULE_VIOLATION")]
    #[case(ErrorKind::ConcurrencyConflict, 409, "CONCURRENT_MODIFICATION")]
    #[case(ErrorKind::Internal, 500, "INTERNAL_ERROR")]
    fn test_kind_round_trip(#[case] kind: ErrorKind, #[case] status: u16, #[case] code: &str) {
        let err = AppError::from_kind(kind, "msg");
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_only_concurrency_is_retryable() {
        assert!(ErrorKind::ConcurrencyConflict.is_retryable());
        assert!(!ErrorKind::StateConflict.is_retryable());
        assert!(!ErrorKind::Internal.is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("Debits: 100, Credits: 90".into()).to_string(),
            "Validation error: Debits: 100, Credits: 90"
        );
        assert_eq!(
            AppError::Database("msg".into()).to_string(),
            "Database error: msg"
        );
        assert_eq!(AppError::Database("x".into()).kind(), ErrorKind::Internal);
    }
}
