//! Integration tests for the fiscal period repository.

mod common;

use chrono::NaiveDate;
use common::{date, empty_database, ledger};
use rust_decimal_macros::dec;
use tally_core::fiscal::{FiscalError, FiscalPeriodStatus, PeriodType};
use tally_core::ledger::JournalLineInput;
use tally_db::StoreError;
use tally_db::repositories::fiscal::{self, NewPeriod};
use tally_db::repositories::journal::{self, NewJournalEntry};
use tally_shared::ErrorKind;
use tally_shared::types::CompanyScope;
use uuid::Uuid;

fn period(name: &str, start: NaiveDate, end: NaiveDate) -> NewPeriod {
    NewPeriod {
        name: name.to_string(),
        period_type: PeriodType::Month,
        start_date: start,
        end_date: end,
    }
}

#[tokio::test]
async fn test_generated_months_cover_the_year() {
    let t = ledger().await;
    let periods = fiscal::list_periods(&t.db, &t.scope).await.unwrap();

    assert_eq!(periods.len(), 12);
    assert_eq!(periods[0].name, "January 2026");
    assert_eq!(periods[0].start_date, date(1, 1));
    assert_eq!(periods[1].start_date, date(2, 1));
    assert_eq!(periods[1].end_date, date(2, 28));
    assert_eq!(periods[11].end_date, date(12, 31));
    assert!(
        periods
            .iter()
            .all(|p| FiscalPeriodStatus::from(p.status) == FiscalPeriodStatus::Open)
    );
}

#[tokio::test]
async fn test_find_period_for_date_includes_both_ends() {
    let t = ledger().await;

    let first = fiscal::find_period_for_date(&t.db, &t.scope, date(3, 1)).await.unwrap().unwrap();
    let last = fiscal::find_period_for_date(&t.db, &t.scope, date(3, 31)).await.unwrap().unwrap();
    assert_eq!(first.id, last.id);
    assert_eq!(first.name, "March 2026");

    let next_year = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
    let none = fiscal::find_period_for_date(&t.db, &t.scope, next_year).await.unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn test_overlapping_period_is_rejected() {
    let db = empty_database().await;
    let scope = CompanyScope::new(Uuid::new_v4(), Uuid::new_v4());

    fiscal::create_period(&db, &scope, period("March", date(3, 1), date(3, 31)))
        .await
        .unwrap();

    // Touches the existing window on its last day.
    let err = fiscal::create_period(&db, &scope, period("Spring", date(3, 31), date(4, 30)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::Overlap { ref name, .. }) if name == "March"));
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    // Encloses it entirely.
    let err = fiscal::create_period(&db, &scope, period("Q1", date(1, 1), date(6, 30)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::Overlap { .. })));

    fiscal::create_period(&db, &scope, period("April", date(4, 1), date(4, 30)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_periods_of_other_companies_do_not_overlap() {
    let t = ledger().await;
    let other = CompanyScope::new(t.scope.tenant(), Uuid::new_v4());

    fiscal::create_period(&t.db, &other, period("March", date(3, 1), date(3, 31)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invalid_range_and_empty_name() {
    let db = empty_database().await;
    let scope = CompanyScope::new(Uuid::new_v4(), Uuid::new_v4());

    let err = fiscal::create_period(&db, &scope, period("Backwards", date(5, 1), date(4, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::InvalidDateRange { .. })));

    let err = fiscal::create_period(&db, &scope, period("  ", date(4, 1), date(4, 30)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::EmptyName)));
}

#[tokio::test]
async fn test_generate_is_all_or_nothing() {
    let t = ledger().await;

    let err = fiscal::generate_periods(&t.db, &t.scope, date(1, 1), date(12, 31), PeriodType::Quarter)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::Overlap { .. })));
    assert_eq!(fiscal::list_periods(&t.db, &t.scope).await.unwrap().len(), 12);
}

#[tokio::test]
async fn test_close_requires_no_drafts() {
    let t = ledger().await;
    let cash = t.account("1000").await;
    let sales = t.account("4000").await;
    let march = fiscal::find_period_for_date(&t.db, &t.scope, date(3, 10)).await.unwrap().unwrap();

    let draft = journal::create_entry(
        &t.db,
        &t.scope,
        &t.config,
        NewJournalEntry::new(
            date(3, 10),
            "Pending",
            vec![
                JournalLineInput::debit(cash, dec!(20)),
                JournalLineInput::credit(sales, dec!(20)),
            ],
        ),
    )
    .await
    .unwrap();

    let err = fiscal::close_period(&t.db, &t.scope, march.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::HasDraftEntries(1))));

    journal::post_entry(&t.db, &t.scope, draft.entry.id, t.user).await.unwrap();
    let closed = fiscal::close_period(&t.db, &t.scope, march.id).await.unwrap();
    assert_eq!(FiscalPeriodStatus::from(closed.status), FiscalPeriodStatus::Closed);
    assert!(closed.closed_at.is_some());
}

#[tokio::test]
async fn test_period_lifecycle() {
    let t = ledger().await;
    let june = fiscal::find_period_for_date(&t.db, &t.scope, date(6, 1)).await.unwrap().unwrap();

    let err = fiscal::lock_period(&t.db, &t.scope, june.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::InvalidTransition { .. })));

    fiscal::close_period(&t.db, &t.scope, june.id).await.unwrap();
    let reopened = fiscal::reopen_period(&t.db, &t.scope, june.id).await.unwrap();
    assert_eq!(FiscalPeriodStatus::from(reopened.status), FiscalPeriodStatus::Open);
    assert!(reopened.closed_at.is_none());

    fiscal::close_period(&t.db, &t.scope, june.id).await.unwrap();
    let locked = fiscal::lock_period(&t.db, &t.scope, june.id).await.unwrap();
    assert_eq!(FiscalPeriodStatus::from(locked.status), FiscalPeriodStatus::Locked);

    let err = fiscal::reopen_period(&t.db, &t.scope, june.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::PeriodLocked)));

    let err = fiscal::require_open_period(&t.db, &t.scope, date(6, 15)).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::PeriodNotOpen { .. })));
}

#[tokio::test]
async fn test_get_period_is_scoped() {
    let t = ledger().await;
    let june = fiscal::find_period_for_date(&t.db, &t.scope, date(6, 1)).await.unwrap().unwrap();
    let other = CompanyScope::new(t.scope.tenant(), Uuid::new_v4());

    let err = fiscal::get_period(&t.db, &other, june.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(FiscalError::PeriodNotFound(id)) if id == june.id));
}
