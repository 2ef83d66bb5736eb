//! Database seeder for Tally development and testing.
//!
//! Seeds a demo company with the default chart of accounts, monthly fiscal
//! periods for the current year and an operating bank account. Safe to run
//! repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use tally_core::accounts::PostingRole;
use tally_core::fiscal::PeriodType;
use tally_db::DatabaseConnection;
use tally_db::repositories::banking::{self, NewBankAccount};
use tally_db::repositories::{accounts, fiscal};
use tally_shared::config::{AppConfig, LoggingConfig};
use tally_shared::types::CompanyScope;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Demo tenant ID (consistent for all seeds)
const DEMO_TENANT_ID: Uuid = Uuid::from_u128(1);
/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: Uuid = Uuid::from_u128(2);

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let db = tally_db::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    let scope = CompanyScope::new(DEMO_TENANT_ID, DEMO_COMPANY_ID);
    let posting = accounts::setup_default_chart(&db, &scope, &config.ledger).await?;
    info!(?posting, "Chart of accounts ready");

    seed_periods(&db, &scope).await?;

    let cash = posting
        .get(PostingRole::Cash)
        .context("default chart has no cash account")?;
    seed_bank_account(&db, &scope, &config, cash).await?;

    info!("Seeding complete");
    Ok(())
}

/// Generates monthly periods for the current year unless any exist.
async fn seed_periods(db: &DatabaseConnection, scope: &CompanyScope) -> anyhow::Result<()> {
    let year = Utc::now().date_naive().year();
    let start = NaiveDate::from_ymd_opt(year, 1, 1).context("invalid year start")?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).context("invalid year end")?;

    if fiscal::find_period_for_date(db, scope, start).await?.is_some() {
        info!(year, "Fiscal periods already exist, skipping");
        return Ok(());
    }

    let periods = fiscal::generate_periods(db, scope, start, end, PeriodType::Month).await?;
    info!(year, count = periods.len(), "Created fiscal periods");
    Ok(())
}

/// Registers an operating bank account on the cash account unless one exists.
async fn seed_bank_account(
    db: &DatabaseConnection,
    scope: &CompanyScope,
    config: &AppConfig,
    cash: Uuid,
) -> anyhow::Result<()> {
    if !banking::list_bank_accounts(db, scope).await?.is_empty() {
        info!("Bank account already exists, skipping");
        return Ok(());
    }

    let account = banking::create_bank_account(
        db,
        scope,
        &config.ledger,
        NewBankAccount {
            name: "Operating Account".to_string(),
            account_number: None,
            currency: None,
            gl_account_id: cash,
        },
    )
    .await?;
    info!(bank_account_id = %account.id, "Created bank account");
    Ok(())
}
