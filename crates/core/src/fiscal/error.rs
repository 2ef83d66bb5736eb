//! Fiscal period errors.

use chrono::NaiveDate;
use tally_shared::{AppError, ErrorKind};
use thiserror::Error;
use uuid::Uuid;

use super::types::FiscalPeriodStatus;

/// Errors raised by fiscal period operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FiscalError {
    /// Period not found in the caller's company.
    #[error("Fiscal period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Start date falls after end date.
    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// Period name is empty.
    #[error("Fiscal period name cannot be empty")]
    EmptyName,

    /// The window intersects an existing period.
    #[error("Date range overlaps existing period '{name}' ({start} to {end})")]
    Overlap {
        /// Name of the existing period.
        name: String,
        /// Its start date.
        start: NaiveDate,
        /// Its end date.
        end: NaiveDate,
    },

    /// No period covers the date.
    #[error("No fiscal period found for date {0}")]
    NoPeriodForDate(NaiveDate),

    /// The period does not accept postings.
    #[error("Fiscal period '{name}' is {status}")]
    PeriodNotOpen {
        /// Period name.
        name: String,
        /// Its status.
        status: FiscalPeriodStatus,
    },

    /// Draft entries still sit in the period.
    #[error("Cannot close period: {0} draft entries remain")]
    HasDraftEntries(u64),

    /// Locked periods cannot change.
    #[error("Fiscal period is locked")]
    PeriodLocked,

    /// The requested transition does not apply to the current status.
    #[error("Cannot {action} a period that is {from}")]
    InvalidTransition {
        /// Current status.
        from: FiscalPeriodStatus,
        /// Attempted action.
        action: &'static str,
    },
}

impl FiscalError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::PeriodNotFound(_) => ErrorKind::NotFound,
            Self::InvalidDateRange { .. } | Self::EmptyName => ErrorKind::ValidationFailed,
            Self::NoPeriodForDate(_) => ErrorKind::ReferentialIntegrity,
            Self::Overlap { .. }
            | Self::PeriodNotOpen { .. }
            | Self::HasDraftEntries(_)
            | Self::PeriodLocked
            | Self::InvalidTransition { .. } => ErrorKind::StateConflict,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::EmptyName => "EMPTY_PERIOD_NAME",
            Self::Overlap { .. } => "PERIOD_OVERLAP",
            Self::NoPeriodForDate(_) => "NO_FISCAL_PERIOD",
            Self::PeriodNotOpen { .. } => "PERIOD_NOT_OPEN",
            Self::HasDraftEntries(_) => "PERIOD_HAS_DRAFTS",
            Self::PeriodLocked => "PERIOD_LOCKED",
            Self::InvalidTransition { .. } => "INVALID_PERIOD_TRANSITION",
        }
    }
}

impl From<FiscalError> for AppError {
    fn from(err: FiscalError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}
