//! Fiscal periods.
//!
//! Period windows, the OPEN ⇄ CLOSED → LOCKED state machine, and the
//! splitting of a fiscal year into monthly or quarterly periods.

pub mod error;
pub mod rules;
pub mod types;

pub use error::FiscalError;
pub use rules::{
    close, ensure_allows_posting, ensure_no_overlap, find_overlap, find_period_for_date, lock,
    reopen, split_periods, validate_date_range,
};
pub use types::{FiscalPeriodStatus, PeriodDraft, PeriodType, PeriodWindow};
