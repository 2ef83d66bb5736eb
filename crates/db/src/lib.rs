//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations
//! - Repositories: modules of free async functions that take an explicit
//!   connection or transaction, load rows, apply `tally-core` rules and
//!   persist the result

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use error::{
    AccountStoreError, DomainError, FiscalStoreError, LedgerStoreError, ReconciliationStoreError,
    ReportStoreError, StoreError, SubledgerStoreError,
};

pub use sea_orm::DatabaseConnection;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DbErr};
use tally_shared::config::DatabaseConfig;

/// Establishes a connection pool sized from configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    tracing::info!(
        max_connections = config.max_connections,
        "connecting to database"
    );
    Database::connect(options).await
}
