//! Period resolution, overlap checks and status transitions.

use chrono::{Datelike, Months, NaiveDate};
use tally_shared::types::DateRange;

use super::error::FiscalError;
use super::types::{FiscalPeriodStatus, PeriodDraft, PeriodType, PeriodWindow};

/// Validates that `start` is on or before `end`.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, FiscalError> {
    DateRange::new(start, end).ok_or(FiscalError::InvalidDateRange { start, end })
}

/// Returns the first existing period intersecting `candidate`.
#[must_use]
pub fn find_overlap<'a>(candidate: &DateRange, existing: &'a [PeriodWindow]) -> Option<&'a PeriodWindow> {
    existing.iter().find(|p| p.range.overlaps(candidate))
}

/// Fails if `candidate` intersects any existing period.
pub fn ensure_no_overlap(candidate: &DateRange, existing: &[PeriodWindow]) -> Result<(), FiscalError> {
    match find_overlap(candidate, existing) {
        Some(p) => Err(FiscalError::Overlap {
            name: p.name.clone(),
            start: p.range.start,
            end: p.range.end,
        }),
        None => Ok(()),
    }
}

/// Resolves the period whose window contains `date`.
#[must_use]
pub fn find_period_for_date(date: NaiveDate, periods: &[PeriodWindow]) -> Option<&PeriodWindow> {
    periods.iter().find(|p| p.range.contains(date))
}

/// Fails unless the period is OPEN.
pub fn ensure_allows_posting(period: &PeriodWindow) -> Result<(), FiscalError> {
    if period.status.allows_posting() {
        Ok(())
    } else {
        Err(FiscalError::PeriodNotOpen {
            name: period.name.clone(),
            status: period.status,
        })
    }
}

/// OPEN → CLOSED, only when no draft entries remain in the period.
pub fn close(status: FiscalPeriodStatus, draft_count: u64) -> Result<FiscalPeriodStatus, FiscalError> {
    match status {
        FiscalPeriodStatus::Open if draft_count > 0 => Err(FiscalError::HasDraftEntries(draft_count)),
        FiscalPeriodStatus::Open => Ok(FiscalPeriodStatus::Closed),
        FiscalPeriodStatus::Locked => Err(FiscalError::PeriodLocked),
        FiscalPeriodStatus::Closed => Err(FiscalError::InvalidTransition {
            from: status,
            action: "close",
        }),
    }
}

/// CLOSED → OPEN. Locked periods never reopen.
pub fn reopen(status: FiscalPeriodStatus) -> Result<FiscalPeriodStatus, FiscalError> {
    match status {
        FiscalPeriodStatus::Closed => Ok(FiscalPeriodStatus::Open),
        FiscalPeriodStatus::Locked => Err(FiscalError::PeriodLocked),
        FiscalPeriodStatus::Open => Err(FiscalError::InvalidTransition {
            from: status,
            action: "reopen",
        }),
    }
}

/// CLOSED → LOCKED. A period must be closed before it can be locked.
pub fn lock(status: FiscalPeriodStatus) -> Result<FiscalPeriodStatus, FiscalError> {
    match status {
        FiscalPeriodStatus::Closed => Ok(FiscalPeriodStatus::Locked),
        FiscalPeriodStatus::Locked => Err(FiscalError::PeriodLocked),
        FiscalPeriodStatus::Open => Err(FiscalError::InvalidTransition {
            from: status,
            action: "lock",
        }),
    }
}

/// Splits `range` into consecutive periods of `period_type`.
///
/// Each period runs to the end of its last calendar month, clipped to
/// `range.end`; the first period starts on `range.start` even mid-month.
#[must_use]
pub fn split_periods(range: DateRange, period_type: PeriodType) -> Vec<PeriodDraft> {
    let mut drafts = Vec::new();
    let mut cursor = Some(range.start);

    while let Some(start) = cursor.filter(|d| *d <= range.end) {
        let end = last_day_of_span(start, period_type.months())
            .map_or(range.end, |d| d.min(range.end));
        let index = drafts.len();
        drafts.push(PeriodDraft {
            name: period_name(period_type, range.start, start, end, index),
            range: DateRange { start, end },
            period_type,
        });
        cursor = end.succ_opt();
    }

    drafts
}

fn last_day_of_span(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start
        .with_day(1)?
        .checked_add_months(Months::new(months))?
        .pred_opt()
}

/// Quarters are numbered and labelled within the fiscal year that begins on
/// `first` or on one of its anniversaries.
fn period_name(period_type: PeriodType, first: NaiveDate, start: NaiveDate, end: NaiveDate, index: usize) -> String {
    match period_type {
        PeriodType::Month => start.format("%B %Y").to_string(),
        PeriodType::Quarter => {
            let fiscal_start = u32::try_from(index / 4)
                .ok()
                .and_then(|years| years.checked_mul(12))
                .and_then(|months| first.checked_add_months(Months::new(months)))
                .unwrap_or(start);
            let fiscal_end = last_day_of_span(fiscal_start, 12).unwrap_or(end);
            let quarter = index % 4 + 1;
            if fiscal_start.year() == fiscal_end.year() {
                format!("Q{quarter} {}", fiscal_start.year())
            } else {
                format!("Q{quarter} {}", year_label(fiscal_start, fiscal_end))
            }
        }
        PeriodType::Year => year_label(start, end),
    }
}

fn year_label(start: NaiveDate, end: NaiveDate) -> String {
    if start.year() == end.year() {
        format!("FY{}", start.year())
    } else {
        format!("FY{}/{:02}", start.year(), end.year() % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn window(name: &str, start: NaiveDate, end: NaiveDate, status: FiscalPeriodStatus) -> PeriodWindow {
        PeriodWindow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            range: DateRange { start, end },
            status,
        }
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(d(2026, 1, 1), d(2026, 1, 1)).is_ok());
        assert_eq!(
            validate_date_range(d(2026, 2, 1), d(2026, 1, 1)),
            Err(FiscalError::InvalidDateRange {
                start: d(2026, 2, 1),
                end: d(2026, 1, 1),
            })
        );
    }

    #[test]
    fn test_overlap_checks_both_endpoints() {
        let existing = vec![window("Q1", d(2026, 1, 1), d(2026, 3, 31), FiscalPeriodStatus::Open)];

        let straddles_end = DateRange { start: d(2026, 3, 31), end: d(2026, 4, 30) };
        let straddles_start = DateRange { start: d(2025, 12, 1), end: d(2026, 1, 1) };
        let inside = DateRange { start: d(2026, 2, 1), end: d(2026, 2, 28) };
        let after = DateRange { start: d(2026, 4, 1), end: d(2026, 6, 30) };

        assert!(matches!(
            ensure_no_overlap(&straddles_end, &existing),
            Err(FiscalError::Overlap { .. })
        ));
        assert!(ensure_no_overlap(&straddles_start, &existing).is_err());
        assert!(ensure_no_overlap(&inside, &existing).is_err());
        assert!(ensure_no_overlap(&after, &existing).is_ok());
    }

    #[test]
    fn test_find_period_for_date() {
        let periods = vec![
            window("January 2026", d(2026, 1, 1), d(2026, 1, 31), FiscalPeriodStatus::Closed),
            window("February 2026", d(2026, 2, 1), d(2026, 2, 28), FiscalPeriodStatus::Open),
        ];
        assert_eq!(find_period_for_date(d(2026, 1, 31), &periods).unwrap().name, "January 2026");
        assert_eq!(find_period_for_date(d(2026, 2, 1), &periods).unwrap().name, "February 2026");
        assert!(find_period_for_date(d(2026, 3, 1), &periods).is_none());
    }

    #[test]
    fn test_posting_requires_open_period() {
        let closed = window("Jan", d(2026, 1, 1), d(2026, 1, 31), FiscalPeriodStatus::Closed);
        let err = ensure_allows_posting(&closed).unwrap_err();
        assert_eq!(err.to_string(), "Fiscal period 'Jan' is closed");
        assert_eq!(err.kind(), tally_shared::ErrorKind::StateConflict);

        let open = window("Feb", d(2026, 2, 1), d(2026, 2, 28), FiscalPeriodStatus::Open);
        assert!(ensure_allows_posting(&open).is_ok());
    }

    #[test]
    fn test_close_with_drafts_fails() {
        assert_eq!(close(FiscalPeriodStatus::Open, 1), Err(FiscalError::HasDraftEntries(1)));
        assert_eq!(close(FiscalPeriodStatus::Open, 0), Ok(FiscalPeriodStatus::Closed));
    }

    #[rstest]
    #[case(FiscalPeriodStatus::Closed, Ok(FiscalPeriodStatus::Open))]
    #[case(FiscalPeriodStatus::Locked, Err(FiscalError::PeriodLocked))]
    #[case(
        FiscalPeriodStatus::Open,
        Err(FiscalError::InvalidTransition { from: FiscalPeriodStatus::Open, action: "reopen" })
    )]
    fn test_reopen(
        #[case] from: FiscalPeriodStatus,
        #[case] expected: Result<FiscalPeriodStatus, FiscalError>,
    ) {
        assert_eq!(reopen(from), expected);
    }

    #[test]
    fn test_lock_is_terminal() {
        assert_eq!(lock(FiscalPeriodStatus::Closed), Ok(FiscalPeriodStatus::Locked));
        assert!(lock(FiscalPeriodStatus::Open).is_err());
        assert_eq!(lock(FiscalPeriodStatus::Locked), Err(FiscalError::PeriodLocked));
        assert_eq!(close(FiscalPeriodStatus::Locked, 0), Err(FiscalError::PeriodLocked));
    }

    #[test]
    fn test_split_full_year_into_months() {
        let year = DateRange { start: d(2026, 1, 1), end: d(2026, 12, 31) };
        let periods = split_periods(year, PeriodType::Month);

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].name, "January 2026");
        assert_eq!(periods[1].range, DateRange { start: d(2026, 2, 1), end: d(2026, 2, 28) });
        assert_eq!(periods[11].name, "December 2026");
        assert_eq!(periods[11].range.end, d(2026, 12, 31));
    }

    #[test]
    fn test_split_offset_year_into_quarters() {
        let year = DateRange { start: d(2026, 7, 1), end: d(2027, 6, 30) };
        let periods = split_periods(year, PeriodType::Quarter);

        let names: Vec<_> = periods.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Q1 FY2026/27", "Q2 FY2026/27", "Q3 FY2026/27", "Q4 FY2026/27"]);
        assert_eq!(periods[0].range.end, d(2026, 9, 30));
        assert_eq!(periods[3].range, DateRange { start: d(2027, 4, 1), end: d(2027, 6, 30) });
    }

    #[test]
    fn test_quarters_restart_each_fiscal_year() {
        let calendar = DateRange { start: d(2026, 1, 1), end: d(2027, 6, 30) };
        let names: Vec<_> = split_periods(calendar, PeriodType::Quarter)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Q1 2026", "Q2 2026", "Q3 2026", "Q4 2026", "Q1 2027", "Q2 2027"]);

        let offset = DateRange { start: d(2026, 7, 1), end: d(2027, 9, 30) };
        let last = split_periods(offset, PeriodType::Quarter).pop().unwrap();
        assert_eq!(last.name, "Q1 FY2027/28");
    }

    #[test]
    fn test_period_type_display() {
        assert_eq!(PeriodType::Quarter.to_string(), "quarter");
        assert_eq!("month".parse::<PeriodType>().unwrap().to_string(), "month");
    }

    #[test]
    fn test_split_clips_partial_tail() {
        let window = DateRange { start: d(2026, 1, 15), end: d(2026, 3, 10) };
        let periods = split_periods(window, PeriodType::Month);

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].range, DateRange { start: d(2026, 1, 15), end: d(2026, 1, 31) });
        assert_eq!(periods[2].range, DateRange { start: d(2026, 3, 1), end: d(2026, 3, 10) });
    }

    #[test]
    fn test_split_single_year() {
        let window = DateRange { start: d(2026, 4, 1), end: d(2027, 3, 31) };
        let periods = split_periods(window, PeriodType::Year);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].name, "FY2026/27");
        assert_eq!(periods[0].range, window);
    }

    #[test]
    fn test_generated_periods_never_overlap() {
        let window = DateRange { start: d(2026, 1, 1), end: d(2027, 12, 31) };
        let periods = split_periods(window, PeriodType::Month);
        for pair in periods.windows(2) {
            assert!(!pair[0].range.overlaps(&pair[1].range));
            assert_eq!(pair[0].range.end.succ_opt(), Some(pair[1].range.start));
        }
    }
}
