//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::DateRange;
use uuid::Uuid;

use crate::accounts::{AccountType, BalanceClass};

/// A journal line of an effective entry, joined with its entry header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedLine {
    /// Owning entry.
    pub entry_id: Uuid,
    /// Entry number.
    pub entry_number: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Position within the entry.
    pub line_number: i32,
    /// Account debited or credited.
    pub account_id: Uuid,
    /// Line memo.
    pub description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl PostedLine {
    /// The line's signed effect, `debit - credit`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Account attributes reports group and label by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Balance-sheet bucket.
    pub balance_class: Option<BalanceClass>,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Balance-sheet bucket.
    pub balance_class: Option<BalanceClass>,
    /// Total debits.
    pub total_debit: Decimal,
    /// Total credits.
    pub total_credit: Decimal,
    /// Signed balance, `total_debit - total_credit`.
    pub balance: Decimal,
}

/// A general ledger line with the account's balance after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The line.
    pub line: PostedLine,
    /// Signed balance of the line's account after this line.
    pub running_balance: Decimal,
}

/// Movements on one account over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountActivity {
    /// Account ID.
    pub account_id: Uuid,
    /// Reported window.
    pub range: DateRange,
    /// Balance as of the day before the window.
    pub opening_balance: Decimal,
    /// Lines inside the window, with running balances.
    pub rows: Vec<LedgerRow>,
    /// Debits inside the window.
    pub total_debit: Decimal,
    /// Credits inside the window.
    pub total_credit: Decimal,
    /// Balance as of the window's last day.
    pub closing_balance: Decimal,
}

/// One row of the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Balance when it is a debit, else zero.
    pub debit: Decimal,
    /// Magnitude of the balance when it is a credit, else zero.
    pub credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// As-of date.
    pub as_of: NaiveDate,
    /// Rows in account-code order.
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Whether the columns agree within tolerance.
    pub is_balanced: bool,
}

/// An account and its amount in a financial statement, in natural sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account ID.
    pub account_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Amount, positive when the account sits on its normal side.
    pub amount: Decimal,
}

/// Income statement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatement {
    /// Reported window.
    pub range: DateRange,
    /// Revenue accounts with activity.
    pub revenue: Vec<StatementLine>,
    /// Expense accounts with activity.
    pub expenses: Vec<StatementLine>,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Total expenses.
    pub total_expenses: Decimal,
    /// `total_revenue - total_expenses`.
    pub net_income: Decimal,
}

/// Current and non-current halves of assets or liabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Current accounts.
    pub current: Vec<StatementLine>,
    /// Non-current accounts.
    pub non_current: Vec<StatementLine>,
    /// Sum of current accounts.
    pub total_current: Decimal,
    /// Sum of non-current accounts.
    pub total_non_current: Decimal,
    /// Section total.
    pub total: Decimal,
}

/// Balance sheet report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// As-of date.
    pub as_of: NaiveDate,
    /// Assets.
    pub assets: BalanceSheetSection,
    /// Liabilities.
    pub liabilities: BalanceSheetSection,
    /// Equity accounts.
    pub equity: Vec<StatementLine>,
    /// Net income of every period through the as-of date.
    pub retained_earnings: Decimal,
    /// Equity accounts plus retained earnings.
    pub total_equity: Decimal,
    /// Liabilities plus equity.
    pub total_liabilities_and_equity: Decimal,
    /// Whether assets agree with liabilities plus equity within tolerance.
    pub is_balanced: bool,
}
