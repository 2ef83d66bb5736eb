//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20261001_000001_ledger;
mod m20261001_000002_subledger;
mod m20261001_000003_banking;
mod m20261001_000004_statement_imports;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_ledger::Migration),
            Box::new(m20261001_000002_subledger::Migration),
            Box::new(m20261001_000003_banking::Migration),
            Box::new(m20261001_000004_statement_imports::Migration),
        ]
    }
}
