//! Reconciliation types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    /// Matching under way.
    InProgress,
    /// Closed; its matches are frozen.
    Completed,
}

impl ReconciliationStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an imported bank statement.
///
/// `debit` is money into the account, `credit` money out, as seen from the
/// company's books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLineInput {
    /// Value date.
    pub transaction_date: NaiveDate,
    /// Bank narrative.
    pub description: String,
    /// Bank reference.
    pub reference: Option<String>,
    /// Money in.
    pub debit: Decimal,
    /// Money out.
    pub credit: Decimal,
}

/// The amounts and state of a stored bank transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankLine {
    /// Transaction ID.
    pub id: Uuid,
    /// Value date.
    pub transaction_date: NaiveDate,
    /// Money in.
    pub debit: Decimal,
    /// Money out.
    pub credit: Decimal,
    /// Whether it has been matched.
    pub is_reconciled: bool,
}

impl BankLine {
    /// Signed effect on the account, `debit - credit`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Balances recorded when a reconciliation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSnapshot {
    /// Closing balance on the bank statement.
    pub statement_balance: Decimal,
    /// Ledger balance of the linked account as of the statement date.
    pub gl_balance: Decimal,
    /// Ledger balance plus unreconciled bank activity up to the statement date.
    pub adjusted_gl_balance: Decimal,
    /// `statement_balance - adjusted_gl_balance`.
    pub difference: Decimal,
}

/// A line of an effective journal entry against the bank's GL account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    /// Journal entry ID.
    pub entry_id: Uuid,
    /// Journal entry number.
    pub entry_number: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Debit on the GL account.
    pub debit: Decimal,
    /// Credit on the GL account.
    pub credit: Decimal,
}

/// A journal entry that plausibly corresponds to a bank transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSuggestion {
    /// Journal entry ID.
    pub entry_id: Uuid,
    /// Journal entry number.
    pub entry_number: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Amount of the closest line on the matching side.
    pub amount: Decimal,
    /// Absolute difference from the bank amount.
    pub amount_difference: Decimal,
    /// Absolute days between entry and bank dates.
    pub days_apart: i64,
}

/// Search window and tolerance for match suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSettings {
    /// Days either side of the bank date.
    pub window_days: i64,
    /// Amount tolerance in percent of the bank amount.
    pub tolerance_percent: u32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            window_days: 7,
            tolerance_percent: 1,
        }
    }
}
