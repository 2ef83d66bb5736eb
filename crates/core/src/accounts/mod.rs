//! Chart of accounts.
//!
//! Account classification, the guards applied when accounts are created,
//! edited or deleted, and the default chart installed for new companies.

pub mod default_chart;
pub mod error;
pub mod rules;
pub mod types;

pub use default_chart::{AccountTemplate, DEFAULT_CHART, PostingRole};
pub use error::AccountError;
pub use rules::{
    creates_cycle, ensure_deletable, ensure_editable, ensure_parent_in_scope,
    ensure_type_change_allowed, validate_code,
};
pub use types::{AccountInfo, AccountType, BalanceClass, NormalBalance};
