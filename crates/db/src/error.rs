//! Persistence-layer errors.
//!
//! Repositories fail either with a domain error from `tally-core` or with a
//! database error. [`StoreError`] carries both and keeps the domain error's
//! [`ErrorKind`], so callers see the same taxonomy whether a rule was broken
//! in memory or the database refused a write.

use sea_orm::DbErr;
use tally_core::{
    accounts::AccountError, fiscal::FiscalError, ledger::LedgerError,
    reconciliation::ReconciliationError, reports::ReportError, subledger::SubledgerError,
};
use tally_shared::{AppError, ErrorKind};
use thiserror::Error;

/// A domain error that knows its taxonomy kind and API code.
pub trait DomainError: std::error::Error + 'static {
    /// Taxonomy kind of the error.
    fn kind(&self) -> ErrorKind;

    /// SCREAMING_SNAKE error code.
    fn error_code(&self) -> &'static str;
}

macro_rules! domain_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl DomainError for $ty {
                fn kind(&self) -> ErrorKind {
                    <$ty>::kind(self)
                }

                fn error_code(&self) -> &'static str {
                    <$ty>::error_code(self)
                }
            }

            impl From<$ty> for StoreError<$ty> {
                fn from(err: $ty) -> Self {
                    Self::Domain(err)
                }
            }
        )+
    };
}

/// Error returned by repository operations.
#[derive(Debug, Error)]
pub enum StoreError<E: DomainError> {
    /// A ledger rule rejected the operation.
    #[error(transparent)]
    Domain(E),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

domain_error!(
    AccountError,
    FiscalError,
    LedgerError,
    ReportError,
    SubledgerError,
    ReconciliationError,
);

impl<E: DomainError> StoreError<E> {
    /// Taxonomy kind; database failures are internal.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Database(_) => ErrorKind::Internal,
        }
    }

    /// Error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if the operation may succeed when retried unchanged.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Returns the domain error, if this is one.
    pub fn domain(&self) -> Option<&E> {
        match self {
            Self::Domain(err) => Some(err),
            Self::Database(_) => None,
        }
    }

    /// Re-wraps the domain error into a wider error type.
    pub fn widen<F>(self) -> StoreError<F>
    where
        F: DomainError + From<E>,
    {
        match self {
            Self::Domain(err) => StoreError::Domain(err.into()),
            Self::Database(err) => StoreError::Database(err),
        }
    }
}

impl<E: DomainError> From<StoreError<E>> for AppError {
    fn from(err: StoreError<E>) -> Self {
        match err {
            StoreError::Domain(err) => Self::from_kind(err.kind(), err.to_string()),
            StoreError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

impl From<FiscalError> for StoreError<LedgerError> {
    fn from(err: FiscalError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<StoreError<FiscalError>> for StoreError<LedgerError> {
    fn from(err: StoreError<FiscalError>) -> Self {
        err.widen()
    }
}

impl From<LedgerError> for StoreError<SubledgerError> {
    fn from(err: LedgerError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<StoreError<LedgerError>> for StoreError<SubledgerError> {
    fn from(err: StoreError<LedgerError>) -> Self {
        err.widen()
    }
}

/// Chart of accounts repository error.
pub type AccountStoreError = StoreError<AccountError>;
/// Fiscal period repository error.
pub type FiscalStoreError = StoreError<FiscalError>;
/// Journal repository error.
pub type LedgerStoreError = StoreError<LedgerError>;
/// Report repository error.
pub type ReportStoreError = StoreError<ReportError>;
/// Subledger repository error.
pub type SubledgerStoreError = StoreError<SubledgerError>;
/// Bank reconciliation repository error.
pub type ReconciliationStoreError = StoreError<ReconciliationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_domain_kind_is_preserved() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let err: LedgerStoreError = FiscalError::NoPeriodForDate(date).into();
        assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);
        assert_eq!(err.error_code(), "NO_FISCAL_PERIOD");
        assert_eq!(err.to_string(), "No fiscal period found for date 2026-03-01");
    }

    #[test]
    fn test_widen_keeps_inner_error() {
        let id = Uuid::new_v4();
        let err: SubledgerStoreError = LedgerStoreError::from(LedgerError::AccountInactive(id)).into();
        assert_eq!(
            err.domain(),
            Some(&SubledgerError::Ledger(LedgerError::AccountInactive(id)))
        );
        assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);
    }

    #[test]
    fn test_database_errors_are_internal() {
        let err: AccountStoreError = DbErr::Custom("boom".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.is_retryable());
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_contention_is_retryable() {
        let err: LedgerStoreError = LedgerError::SequenceContention {
            scope: "JE-2026".into(),
            attempts: 3,
        }
        .into();
        assert!(err.is_retryable());
        let app: AppError = err.into();
        assert_eq!(app.kind(), ErrorKind::ConcurrencyConflict);
    }
}
