//! Integration tests for bank accounts, statement import and reconciliation.

mod common;

use chrono::NaiveDate;
use common::{TestLedger, date, ledger};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::ledger::JournalLineInput;
use tally_core::reconciliation::{ReconciliationError, ReconciliationStatus, StatementLineInput};
use tally_db::StoreError;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tally_db::entities::{bank_accounts, statement_imports};
use tally_db::repositories::banking::{self, NewBankAccount};
use tally_db::repositories::journal::{self, NewJournalEntry};
use tally_shared::ErrorKind;

fn deposit(on: NaiveDate, amount: Decimal) -> StatementLineInput {
    StatementLineInput {
        transaction_date: on,
        description: "Deposit".to_string(),
        reference: None,
        debit: amount,
        credit: Decimal::ZERO,
    }
}

fn withdrawal(on: NaiveDate, amount: Decimal) -> StatementLineInput {
    StatementLineInput {
        transaction_date: on,
        description: "Withdrawal".to_string(),
        reference: None,
        debit: Decimal::ZERO,
        credit: amount,
    }
}

async fn bank(t: &TestLedger) -> bank_accounts::Model {
    let cash = t.account("1000").await;
    banking::create_bank_account(
        &t.db,
        &t.scope,
        &t.config,
        NewBankAccount {
            name: "Current Account".to_string(),
            account_number: Some("000123456".to_string()),
            currency: None,
            gl_account_id: cash,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_bank_account_needs_active_asset_account() {
    let t = ledger().await;
    let account = bank(&t).await;
    assert_eq!(account.currency, "MUR");
    assert_eq!(account.current_balance, dec!(0));

    let sales = t.account("4000").await;
    let err = banking::create_bank_account(
        &t.db,
        &t.scope,
        &t.config,
        NewBankAccount {
            name: "Wrong".to_string(),
            account_number: None,
            currency: None,
            gl_account_id: sales,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::InvalidGlAccount(id)) if id == sales));
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);

    let listed = banking::list_bank_accounts(&t.db, &t.scope).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_import_is_idempotent_per_batch() {
    let t = ledger().await;
    let account = bank(&t).await;

    let rows = banking::import_statement(
        &t.db,
        &t.scope,
        account.id,
        "B1",
        vec![deposit(date(3, 2), dec!(500)), withdrawal(date(3, 3), dec!(120))],
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| !r.is_reconciled && r.import_batch == "B1"));

    let err = banking::import_statement(&t.db, &t.scope, account.id, "B1", vec![deposit(date(3, 4), dec!(1))])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::DuplicateBatch(ref b)) if b == "B1"));

    let listed = banking::list_transactions(&t.db, &t.scope, account.id, false).await.unwrap();
    assert_eq!(listed.len(), 2);
    let account = banking::get_bank_account(&t.db, &t.scope, account.id).await.unwrap();
    assert_eq!(account.current_balance, dec!(380));
}

#[tokio::test]
async fn test_batch_key_is_unique_per_bank_account() {
    let t = ledger().await;
    let current = bank(&t).await;
    let receivables = t.account("1100").await;
    let savings = banking::create_bank_account(
        &t.db,
        &t.scope,
        &t.config,
        NewBankAccount {
            name: "Savings".to_string(),
            account_number: None,
            currency: None,
            gl_account_id: receivables,
        },
    )
    .await
    .unwrap();

    let statement = || vec![deposit(date(3, 2), dec!(75)), withdrawal(date(3, 3), dec!(25))];
    banking::import_statement(&t.db, &t.scope, current.id, "MAR", statement()).await.unwrap();
    banking::import_statement(&t.db, &t.scope, savings.id, "MAR", statement()).await.unwrap();

    let err = banking::import_statement(&t.db, &t.scope, current.id, " MAR ", statement())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::DuplicateBatch(ref b)) if b == "MAR"));
    assert_eq!(err.kind(), ErrorKind::StateConflict);

    let imports = statement_imports::Entity::find()
        .filter(statement_imports::Column::BankAccountId.eq(current.id))
        .all(&t.db)
        .await
        .unwrap();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].line_count, 2);
    assert_eq!(imports[0].net, dec!(50));

    let current = banking::get_bank_account(&t.db, &t.scope, current.id).await.unwrap();
    assert_eq!(current.current_balance, dec!(50));
}

#[tokio::test]
async fn test_import_rejects_invalid_lines() {
    let t = ledger().await;
    let account = bank(&t).await;

    let mut both = deposit(date(3, 2), dec!(10));
    both.credit = dec!(10);
    let err = banking::import_statement(&t.db, &t.scope, account.id, "B1", vec![deposit(date(3, 1), dec!(5)), both])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(ReconciliationError::InvalidStatementLine { line: 2, .. })
    ));

    let err = banking::import_statement(&t.db, &t.scope, account.id, "B1", vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::EmptyStatement)));

    // Nothing was written, so the batch id is still free.
    banking::import_statement(&t.db, &t.scope, account.id, "B1", vec![deposit(date(3, 1), dec!(5))])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_reconciliation_completes_once_matched() {
    let t = ledger().await;
    let account = bank(&t).await;
    t.post_simple(date(3, 1), "1000", "3000", dec!(950)).await;
    let rows = banking::import_statement(&t.db, &t.scope, account.id, "MAR", vec![deposit(date(3, 15), dec!(50))])
        .await
        .unwrap();

    let rec = banking::start_reconciliation(&t.db, &t.scope, account.id, date(3, 31), dec!(1000))
        .await
        .unwrap();
    assert_eq!(rec.gl_balance, dec!(950));
    assert_eq!(rec.adjusted_gl_balance, dec!(1000));
    assert_eq!(rec.difference, dec!(0));

    let err = banking::start_reconciliation(&t.db, &t.scope, account.id, date(3, 31), dec!(1000))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::AlreadyInProgress(id)) if id == rec.id));

    let err = banking::complete_reconciliation(&t.db, &t.scope, rec.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::UnreconciledRemaining(1))));

    let matched = banking::match_transaction(&t.db, &t.scope, rec.id, rows[0].id, None)
        .await
        .unwrap();
    assert!(matched.is_reconciled);
    assert_eq!(matched.reconciliation_id, Some(rec.id));

    let done = banking::complete_reconciliation(&t.db, &t.scope, rec.id).await.unwrap();
    assert_eq!(ReconciliationStatus::from(done.status), ReconciliationStatus::Completed);
    assert!(done.completed_at.is_some());

    let account = banking::get_bank_account(&t.db, &t.scope, account.id).await.unwrap();
    assert_eq!(account.last_reconciled_balance, Some(dec!(1000)));
    assert!(account.last_reconciled_at.is_some());

    let err = banking::unmatch_transaction(&t.db, &t.scope, rows[0].id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::ReconciliationCompleted(_))));

    let err = banking::cancel_reconciliation(&t.db, &t.scope, rec.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::ReconciliationCompleted(_))));

    // The next statement can start now.
    banking::start_reconciliation(&t.db, &t.scope, account.id, date(4, 30), dec!(1000))
        .await
        .unwrap();
    let history = banking::list_reconciliations(&t.db, &t.scope, account.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].statement_date, date(4, 30));
}

#[tokio::test]
async fn test_unresolved_difference_blocks_completion() {
    let t = ledger().await;
    let account = bank(&t).await;
    t.post_simple(date(3, 1), "1000", "3000", dec!(950)).await;

    let rec = banking::start_reconciliation(&t.db, &t.scope, account.id, date(3, 31), dec!(1000))
        .await
        .unwrap();
    assert_eq!(rec.difference, dec!(50));

    let err = banking::complete_reconciliation(&t.db, &t.scope, rec.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::DifferenceNotResolved(d)) if d == dec!(50)));
}

#[tokio::test]
async fn test_match_rules() {
    let t = ledger().await;
    let account = bank(&t).await;
    let rows = banking::import_statement(&t.db, &t.scope, account.id, "MAR", vec![deposit(date(3, 15), dec!(50))])
        .await
        .unwrap();
    let rec = banking::start_reconciliation(&t.db, &t.scope, account.id, date(3, 31), dec!(50))
        .await
        .unwrap();

    let cash = t.account("1000").await;
    let sales = t.account("4000").await;
    let draft = journal::create_entry(
        &t.db,
        &t.scope,
        &t.config,
        NewJournalEntry::new(
            date(3, 15),
            "Deposit",
            vec![
                JournalLineInput::debit(cash, dec!(50)),
                JournalLineInput::credit(sales, dec!(50)),
            ],
        ),
    )
    .await
    .unwrap();

    let err = banking::match_transaction(&t.db, &t.scope, rec.id, rows[0].id, Some(draft.entry.id))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::EntryNotLinkable(id)) if id == draft.entry.id));

    journal::post_entry(&t.db, &t.scope, draft.entry.id, t.user).await.unwrap();
    let matched = banking::match_transaction(&t.db, &t.scope, rec.id, rows[0].id, Some(draft.entry.id))
        .await
        .unwrap();
    assert_eq!(matched.journal_entry_id, Some(draft.entry.id));

    let err = banking::match_transaction(&t.db, &t.scope, rec.id, rows[0].id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::AlreadyReconciled(_))));

    let unmatched = banking::unmatch_transaction(&t.db, &t.scope, rows[0].id).await.unwrap();
    assert!(!unmatched.is_reconciled);
    assert_eq!(unmatched.journal_entry_id, None);

    let err = banking::unmatch_transaction(&t.db, &t.scope, rows[0].id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::NotReconciled(_))));
}

#[tokio::test]
async fn test_cancel_releases_transactions() {
    let t = ledger().await;
    let account = bank(&t).await;
    let rows = banking::import_statement(&t.db, &t.scope, account.id, "MAR", vec![deposit(date(3, 15), dec!(50))])
        .await
        .unwrap();
    let rec = banking::start_reconciliation(&t.db, &t.scope, account.id, date(3, 31), dec!(50))
        .await
        .unwrap();
    banking::match_transaction(&t.db, &t.scope, rec.id, rows[0].id, None)
        .await
        .unwrap();

    banking::cancel_reconciliation(&t.db, &t.scope, rec.id).await.unwrap();

    let err = banking::get_reconciliation(&t.db, &t.scope, rec.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Domain(ReconciliationError::ReconciliationNotFound(_))));
    let open = banking::list_transactions(&t.db, &t.scope, account.id, true).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].reconciliation_id, None);
}

#[tokio::test]
async fn test_suggestions_rank_and_exclude_linked_entries() {
    let t = ledger().await;
    let account = bank(&t).await;
    let rows = banking::import_statement(
        &t.db,
        &t.scope,
        account.id,
        "APR",
        vec![deposit(date(4, 10), dec!(300)), deposit(date(4, 11), dec!(300))],
    )
    .await
    .unwrap();

    let exact = t.post_simple(date(4, 12), "1000", "4000", dec!(300)).await;
    let close = t.post_simple(date(4, 10), "1000", "4000", dec!(302)).await;
    // Outside the window, and on the wrong side.
    t.post_simple(date(4, 20), "1000", "4000", dec!(300)).await;
    t.post_simple(date(4, 10), "6300", "1000", dec!(300)).await;

    let suggestions = banking::suggest_matches(&t.db, &t.scope, &t.config, rows[0].id).await.unwrap();
    let ids: Vec<_> = suggestions.iter().map(|s| s.entry_id).collect();
    assert_eq!(ids, [exact.entry.id, close.entry.id]);
    assert_eq!(suggestions[0].days_apart, 2);
    assert_eq!(suggestions[1].amount_difference, dec!(2));

    let rec = banking::start_reconciliation(&t.db, &t.scope, account.id, date(4, 30), dec!(600))
        .await
        .unwrap();
    banking::match_transaction(&t.db, &t.scope, rec.id, rows[1].id, Some(exact.entry.id))
        .await
        .unwrap();

    let suggestions = banking::suggest_matches(&t.db, &t.scope, &t.config, rows[0].id).await.unwrap();
    let ids: Vec<_> = suggestions.iter().map(|s| s.entry_id).collect();
    assert_eq!(ids, [close.entry.id]);

    let none = banking::suggest_matches(&t.db, &t.scope, &t.config, rows[1].id).await.unwrap();
    assert!(none.is_empty());
}
