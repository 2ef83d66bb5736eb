//! Integration tests for report queries.

mod common;

use common::{TestLedger, date, ledger};
use rust_decimal_macros::dec;
use tally_core::ledger::{JournalEntryStatus, JournalLineInput};
use tally_core::reports::ReportError;
use tally_db::StoreError;
use tally_db::repositories::accounts;
use tally_db::repositories::journal::{self, NewJournalEntry};
use tally_db::repositories::reports::{self, LineFilter};
use tally_shared::types::{CompanyScope, PageRequest};
use uuid::Uuid;

/// Capital in January, a sale and rent in February, equipment in March.
async fn books() -> TestLedger {
    let t = ledger().await;
    t.post_simple(date(1, 10), "1000", "3000", dec!(1000)).await;
    t.post_simple(date(2, 5), "1000", "4000", dec!(300)).await;
    t.post_simple(date(2, 20), "6300", "1000", dec!(100)).await;
    t.post_simple(date(3, 1), "1210", "1000", dec!(200)).await;
    t
}

#[tokio::test]
async fn test_account_balance_as_of_date() {
    let t = books().await;
    let cash = t.account("1000").await;

    let at = |m, d| reports::account_balance(&t.db, &t.scope, cash, Some(date(m, d)));
    assert_eq!(at(1, 9).await.unwrap(), dec!(0));
    assert_eq!(at(1, 10).await.unwrap(), dec!(1000));
    assert_eq!(at(2, 28).await.unwrap(), dec!(1200));
    assert_eq!(reports::account_balance(&t.db, &t.scope, cash, None).await.unwrap(), dec!(1000));
}

#[tokio::test]
async fn test_account_balance_of_foreign_account_is_not_found() {
    let t = books().await;
    let other = CompanyScope::new(t.scope.tenant(), Uuid::new_v4());
    let cash = t.account("1000").await;

    let err = reports::account_balance(&t.db, &other, cash, None).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReportError::AccountNotFound(id)) if id == cash));
}

#[tokio::test]
async fn test_drafts_are_not_reported() {
    let t = books().await;
    let cash = t.account("1000").await;
    let sales = t.account("4000").await;
    journal::create_entry(
        &t.db,
        &t.scope,
        &t.config,
        NewJournalEntry::new(
            date(3, 5),
            "Unposted sale",
            vec![
                JournalLineInput::debit(cash, dec!(999)),
                JournalLineInput::credit(sales, dec!(999)),
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(reports::account_balance(&t.db, &t.scope, cash, None).await.unwrap(), dec!(1000));

    let balances = reports::account_balances(&t.db, &t.scope, None).await.unwrap();
    let codes: Vec<&str> = balances.iter().map(|b| b.code.as_str()).collect();
    assert_eq!(codes, ["1000", "1210", "3000", "4000", "6300"]);
}

#[tokio::test]
async fn test_trial_balance_columns_agree() {
    let t = books().await;
    let report = reports::trial_balance(&t.db, &t.scope, date(3, 31)).await.unwrap();

    assert!(report.is_balanced);
    assert_eq!(report.total_debit, dec!(1300));
    assert_eq!(report.total_credit, dec!(1300));

    let sales = report.rows.iter().find(|r| r.code == "4000").unwrap();
    assert_eq!(sales.debit, dec!(0));
    assert_eq!(sales.credit, dec!(300));
}

#[tokio::test]
async fn test_income_statement_for_february() {
    let t = books().await;
    let report = reports::income_statement(&t.db, &t.scope, date(2, 1), date(2, 28))
        .await
        .unwrap();

    assert_eq!(report.total_revenue, dec!(300));
    assert_eq!(report.total_expenses, dec!(100));
    assert_eq!(report.net_income, dec!(200));

    let january = reports::income_statement(&t.db, &t.scope, date(1, 1), date(1, 31))
        .await
        .unwrap();
    assert_eq!(january.net_income, dec!(0));
}

#[tokio::test]
async fn test_income_statement_rejects_reversed_range() {
    let t = books().await;
    let err = reports::income_statement(&t.db, &t.scope, date(3, 1), date(2, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReportError::InvalidDateRange { .. })));
}

#[tokio::test]
async fn test_balance_sheet_uses_balance_class_and_derived_earnings() {
    let t = books().await;
    let report = reports::balance_sheet(&t.db, &t.scope, date(3, 31)).await.unwrap();

    assert_eq!(report.assets.total_current, dec!(1000));
    assert_eq!(report.assets.total_non_current, dec!(200));
    assert_eq!(report.assets.total, dec!(1200));
    assert_eq!(report.liabilities.total, dec!(0));
    assert_eq!(report.retained_earnings, dec!(200));
    assert_eq!(report.total_equity, dec!(1200));
    assert_eq!(report.total_liabilities_and_equity, dec!(1200));
    assert!(report.is_balanced);
}

#[tokio::test]
async fn test_general_ledger_seeds_running_balance_before_range() {
    let t = books().await;
    let cash = t.account("1000").await;
    let filter = LineFilter {
        account_id: Some(cash),
        from: Some(date(2, 1)),
        to: Some(date(3, 31)),
        ..LineFilter::default()
    };

    let all = reports::general_ledger(&t.db, &t.scope, filter.clone(), PageRequest::default())
        .await
        .unwrap();
    let running: Vec<_> = all.data.iter().map(|r| r.running_balance).collect();
    assert_eq!(running, [dec!(1300), dec!(1200), dec!(1000)]);
    assert_eq!(all.meta.total, 3);

    let second_page = reports::general_ledger(&t.db, &t.scope, filter, PageRequest { page: 2, per_page: 2 })
        .await
        .unwrap();
    assert_eq!(second_page.data.len(), 1);
    assert_eq!(second_page.data[0].running_balance, dec!(1000));
    assert_eq!(second_page.data[0].line.entry_date, date(3, 1));
}

#[tokio::test]
async fn test_general_ledger_can_list_drafts_on_request() {
    let t = books().await;
    let cash = t.account("1000").await;
    let sales = t.account("4000").await;
    journal::create_entry(
        &t.db,
        &t.scope,
        &t.config,
        NewJournalEntry::new(
            date(3, 5),
            "Unposted sale",
            vec![
                JournalLineInput::debit(cash, dec!(10)),
                JournalLineInput::credit(sales, dec!(10)),
            ],
        ),
    )
    .await
    .unwrap();

    let filter = LineFilter {
        statuses: vec![JournalEntryStatus::Draft],
        ..LineFilter::default()
    };
    let drafts = reports::general_ledger(&t.db, &t.scope, filter, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(drafts.meta.total, 2);
}

#[tokio::test]
async fn test_account_activity_for_february() {
    let t = books().await;
    let cash = t.account("1000").await;
    let activity = reports::account_activity(&t.db, &t.scope, cash, date(2, 1), date(2, 28))
        .await
        .unwrap();

    assert_eq!(activity.opening_balance, dec!(1000));
    assert_eq!(activity.total_debit, dec!(300));
    assert_eq!(activity.total_credit, dec!(100));
    assert_eq!(activity.closing_balance, dec!(1200));
    assert_eq!(activity.rows.len(), 2);
}

#[tokio::test]
async fn test_reversed_entries_net_to_zero() {
    let t = books().await;
    let sale = t.post_simple(date(3, 10), "1000", "4000", dec!(50)).await;
    journal::reverse_entry(&t.db, &t.scope, &t.config, sale.entry.id, date(3, 11), None, t.user)
        .await
        .unwrap();

    let report = reports::income_statement(&t.db, &t.scope, date(3, 1), date(3, 31))
        .await
        .unwrap();
    assert_eq!(report.total_revenue, dec!(0));

    let trial = reports::trial_balance(&t.db, &t.scope, date(3, 31)).await.unwrap();
    assert!(trial.is_balanced);
}

#[tokio::test]
async fn test_trial_balance_keeps_deactivated_accounts() {
    let t = books().await;
    let equipment = t.account("1210").await;
    accounts::set_active(&t.db, &t.scope, equipment, false).await.unwrap();

    let trial = reports::trial_balance(&t.db, &t.scope, date(3, 31)).await.unwrap();
    assert!(trial.is_balanced);
    assert_eq!(trial.total_debit, dec!(1300));
    assert!(trial.rows.iter().any(|r| r.code == "1210" && r.debit == dec!(200)));

    let sheet = reports::balance_sheet(&t.db, &t.scope, date(3, 31)).await.unwrap();
    assert_eq!(sheet.assets.total, dec!(1200));

    let active = reports::account_balances(&t.db, &t.scope, None).await.unwrap();
    assert!(active.iter().all(|b| b.code != "1210"));
}
