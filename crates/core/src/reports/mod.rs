//! Financial report generation.
//!
//! Pure derivations over lines of effective (posted or reversed) entries:
//! - Account balances and account activity
//! - General ledger listing with running balances
//! - Trial balance
//! - Income statement
//! - Balance sheet

pub mod balances;
pub mod error;
pub mod statements;
pub mod types;

#[cfg(test)]
mod statements_props;

pub use balances::{account_activity, account_balances, general_ledger, ledger_balances, signed_balance};
pub use error::ReportError;
pub use statements::{balance_sheet, income_statement, trial_balance};
pub use types::*;
