//! Fiscal period types.

use serde::{Deserialize, Serialize};
use tally_shared::types::DateRange;
use uuid::Uuid;

/// Length of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Twelve months.
    Year,
    /// Three months.
    Quarter,
    /// One calendar month.
    Month,
}

impl PeriodType {
    /// Number of months a period of this type spans.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Year => 12,
            Self::Quarter => 3,
            Self::Month => 1,
        }
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Quarter => "quarter",
            Self::Month => "month",
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "quarter" => Ok(Self::Quarter),
            "month" => Ok(Self::Month),
            _ => Err(format!("Unknown period type: {s}")),
        }
    }
}

/// Status of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalPeriodStatus {
    /// Entries can be created and posted.
    Open,
    /// No postings; may be reopened.
    Closed,
    /// Permanently closed.
    Locked,
}

impl FiscalPeriodStatus {
    /// Returns true if entries dated in the period may be created or posted.
    #[must_use]
    pub const fn allows_posting(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Locked => "locked",
        }
    }
}

impl std::fmt::Display for FiscalPeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a stored period needed for date resolution and overlap checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodWindow {
    /// The period ID.
    pub id: Uuid,
    /// Period name.
    pub name: String,
    /// Inclusive date window.
    pub range: DateRange,
    /// Current status.
    pub status: FiscalPeriodStatus,
}

/// A period about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodDraft {
    /// Generated name, e.g. "March 2026", "Q2 2026" or "Q1 FY2026/27".
    pub name: String,
    /// Inclusive date window.
    pub range: DateRange,
    /// Period length.
    pub period_type: PeriodType,
}
