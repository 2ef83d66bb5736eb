//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database with the schema
//! migrated, the default chart of accounts and monthly periods for 2026.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tally_core::fiscal::PeriodType;
use tally_core::ledger::JournalLineInput;
use tally_core::subledger::PostingAccounts;
use tally_db::migration::Migrator;
use tally_db::repositories::journal::{self, EntryWithLines, NewJournalEntry};
use tally_db::repositories::{accounts, fiscal};
use tally_shared::config::{DatabaseConfig, LedgerConfig};
use tally_shared::types::{CompanyScope, UserId};
use uuid::Uuid;

pub struct TestLedger {
    pub db: DatabaseConnection,
    pub scope: CompanyScope,
    pub config: LedgerConfig,
    pub posting: PostingAccounts,
    pub user: UserId,
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

pub async fn empty_database() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = tally_db::connect(&config).await.expect("connect to sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// A migrated database with one company that has a chart and 2026 periods.
pub async fn ledger() -> TestLedger {
    let db = empty_database().await;
    let scope = CompanyScope::new(Uuid::new_v4(), Uuid::new_v4());
    let config = LedgerConfig::default();

    let posting = accounts::setup_default_chart(&db, &scope, &config)
        .await
        .expect("default chart");
    fiscal::generate_periods(&db, &scope, date(1, 1), date(12, 31), PeriodType::Month)
        .await
        .expect("2026 periods");

    TestLedger {
        db,
        scope,
        config,
        posting,
        user: UserId::new(),
    }
}

impl TestLedger {
    /// Id of the account with `code` in the default chart.
    pub async fn account(&self, code: &str) -> Uuid {
        accounts::find_by_code(&self.db, &self.scope, code)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("account {code} missing"))
            .id
    }

    /// Creates and posts `debit_code` Dr / `credit_code` Cr for `amount`.
    pub async fn post_simple(
        &self,
        entry_date: NaiveDate,
        debit_code: &str,
        credit_code: &str,
        amount: Decimal,
    ) -> EntryWithLines {
        let lines = vec![
            JournalLineInput::debit(self.account(debit_code).await, amount),
            JournalLineInput::credit(self.account(credit_code).await, amount),
        ];
        journal::create_and_post(
            &self.db,
            &self.scope,
            &self.config,
            NewJournalEntry::new(entry_date, "Test entry", lines),
            self.user,
        )
        .await
        .expect("post entry")
    }
}
