//! Inclusive date windows.
//!
//! Period and report boundaries are inclusive on both ends.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, returning `None` when `start > end`.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Returns true if `date` falls within the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Two inclusive ranges intersect when each starts on or before the other ends.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// The day before `start`, the as-of date of an opening balance.
    #[must_use]
    pub fn day_before_start(&self) -> Option<NaiveDate> {
        self.start.pred_opt()
    }
}
