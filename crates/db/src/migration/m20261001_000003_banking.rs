//! Banking tables: bank accounts, imported statement lines and
//! reconciliations.

use sea_orm_migration::prelude::*;

use super::m20261001_000001_ledger::{Accounts, JournalEntries, money, timestamp};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BankAccounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BankAccounts::TenantId).uuid().not_null())
                    .col(ColumnDef::new(BankAccounts::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(BankAccounts::Name).string_len(255).not_null())
                    .col(ColumnDef::new(BankAccounts::AccountNumber).string_len(50))
                    .col(ColumnDef::new(BankAccounts::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(BankAccounts::GlAccountId).uuid().not_null())
                    .col(money(BankAccounts::CurrentBalance))
                    .col(ColumnDef::new(BankAccounts::LastReconciledBalance).decimal_len(16, 4))
                    .col(ColumnDef::new(BankAccounts::LastReconciledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(BankAccounts::IsActive).boolean().not_null().default(true))
                    .col(timestamp(BankAccounts::CreatedAt))
                    .col(timestamp(BankAccounts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_accounts_gl_account")
                            .from(BankAccounts::Table, BankAccounts::GlAccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankReconciliations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BankReconciliations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BankReconciliations::TenantId).uuid().not_null())
                    .col(ColumnDef::new(BankReconciliations::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(BankReconciliations::BankAccountId).uuid().not_null())
                    .col(ColumnDef::new(BankReconciliations::StatementDate).date().not_null())
                    .col(money(BankReconciliations::StatementBalance))
                    .col(money(BankReconciliations::GlBalance))
                    .col(money(BankReconciliations::AdjustedGlBalance))
                    .col(money(BankReconciliations::Difference))
                    .col(
                        ColumnDef::new(BankReconciliations::Status)
                            .string_len(20)
                            .not_null()
                            .default("in_progress"),
                    )
                    .col(ColumnDef::new(BankReconciliations::CompletedAt).timestamp_with_time_zone())
                    .col(timestamp(BankReconciliations::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_reconciliations_bank_account")
                            .from(BankReconciliations::Table, BankReconciliations::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankTransactions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BankTransactions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(BankTransactions::BankAccountId).uuid().not_null())
                    .col(ColumnDef::new(BankTransactions::TransactionDate).date().not_null())
                    .col(ColumnDef::new(BankTransactions::Description).text().not_null())
                    .col(ColumnDef::new(BankTransactions::Reference).string_len(100))
                    .col(money(BankTransactions::Debit))
                    .col(money(BankTransactions::Credit))
                    .col(ColumnDef::new(BankTransactions::ImportBatch).string_len(100).not_null())
                    .col(
                        ColumnDef::new(BankTransactions::IsReconciled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(BankTransactions::JournalEntryId).uuid())
                    .col(ColumnDef::new(BankTransactions::ReconciliationId).uuid())
                    .col(ColumnDef::new(BankTransactions::ReconciledAt).timestamp_with_time_zone())
                    .col(timestamp(BankTransactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_transactions_bank_account")
                            .from(BankTransactions::Table, BankTransactions::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_transactions_journal_entry")
                            .from(BankTransactions::Table, BankTransactions::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bank_transactions_reconciliation")
                            .from(BankTransactions::Table, BankTransactions::ReconciliationId)
                            .to(BankReconciliations::Table, BankReconciliations::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bank_transactions_batch")
                    .table(BankTransactions::Table)
                    .col(BankTransactions::BankAccountId)
                    .col(BankTransactions::ImportBatch)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BankTransactions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankReconciliations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum BankAccounts {
    Table,
    Id,
    TenantId,
    CompanyId,
    Name,
    AccountNumber,
    Currency,
    GlAccountId,
    CurrentBalance,
    LastReconciledBalance,
    LastReconciledAt,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum BankReconciliations {
    Table,
    Id,
    TenantId,
    CompanyId,
    BankAccountId,
    StatementDate,
    StatementBalance,
    GlBalance,
    AdjustedGlBalance,
    Difference,
    Status,
    CompletedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BankTransactions {
    Table,
    Id,
    BankAccountId,
    TransactionDate,
    Description,
    Reference,
    Debit,
    Credit,
    ImportBatch,
    IsReconciled,
    JournalEntryId,
    ReconciliationId,
    ReconciledAt,
    CreatedAt,
}
