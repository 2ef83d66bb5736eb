//! Domain types for journal entries and lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::amounts_match;
use uuid::Uuid;

/// Status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryStatus {
    /// Freely editable and deletable.
    Draft,
    /// Effective and immutable.
    Posted,
    /// Posted, then offset by a mirror entry. Terminal.
    Reversed,
}

impl JournalEntryStatus {
    /// Returns true if the entry's lines may still change.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry's lines count towards balances.
    ///
    /// A reversed entry was posted and stays in the ledger; its mirror
    /// entry cancels it out.
    #[must_use]
    pub const fn affects_balances(self) -> bool {
        matches!(self, Self::Posted | Self::Reversed)
    }

    /// Statuses whose lines count towards balances.
    pub const EFFECTIVE: [Self; 2] = [Self::Posted, Self::Reversed];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Reversed => "reversed",
        }
    }
}

impl std::fmt::Display for JournalEntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business origin of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalEntryType {
    /// Manual journal.
    General,
    /// Posted from a customer invoice.
    Sales,
    /// Posted from a supplier bill.
    Purchase,
    /// Customer payment received.
    Receipt,
    /// Supplier payment made.
    Disbursement,
    /// Correction, including reversals.
    Adjustment,
    /// Opening balances.
    Opening,
}

impl JournalEntryType {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
            Self::Receipt => "receipt",
            Self::Disbursement => "disbursement",
            Self::Adjustment => "adjustment",
            Self::Opening => "opening",
        }
    }
}

/// A journal line as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLineInput {
    /// Account debited or credited.
    pub account_id: Uuid,
    /// Debit amount, zero on a credit line.
    pub debit: Decimal,
    /// Credit amount, zero on a debit line.
    pub credit: Decimal,
    /// Optional line memo.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// A debit line.
    #[must_use]
    pub fn debit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
            description: None,
        }
    }

    /// A credit line.
    #[must_use]
    pub fn credit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
            description: None,
        }
    }

    /// Attaches a memo to the line.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A validated line with its position in the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedLine {
    /// 1-based position within the entry.
    pub line_number: i32,
    /// Account debited or credited.
    pub account_id: Uuid,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Optional line memo.
    pub description: Option<String>,
}

/// Debit and credit totals of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
    /// Whether the two agree within tolerance.
    pub is_balanced: bool,
}

impl LineTotals {
    /// Creates totals, deriving the balanced flag.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: amounts_match(debit, credit),
        }
    }
}
