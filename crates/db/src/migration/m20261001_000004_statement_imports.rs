//! One row per imported statement batch; the unique key makes re-imports fail.

use sea_orm_migration::prelude::*;

use super::m20261001_000001_ledger::{money, timestamp};
use super::m20261001_000003_banking::BankAccounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StatementImports::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StatementImports::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(StatementImports::BankAccountId).uuid().not_null())
                    .col(ColumnDef::new(StatementImports::ImportBatch).string_len(100).not_null())
                    .col(ColumnDef::new(StatementImports::LineCount).integer().not_null())
                    .col(money(StatementImports::Net))
                    .col(timestamp(StatementImports::ImportedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_statement_imports_bank_account")
                            .from(StatementImports::Table, StatementImports::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_statement_imports_batch")
                    .table(StatementImports::Table)
                    .col(StatementImports::BankAccountId)
                    .col(StatementImports::ImportBatch)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatementImports::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum StatementImports {
    Table,
    Id,
    BankAccountId,
    ImportBatch,
    LineCount,
    Net,
    ImportedAt,
}
