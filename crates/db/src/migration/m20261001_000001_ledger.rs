//! Ledger tables: chart of accounts, fiscal periods, journal entries and
//! number sequences.
//!
//! Built with the schema builder so the same migration runs on `PostgreSQL`
//! and on the `SQLite` databases used by the integration tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: CHART OF ACCOUNTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::Code).string_len(20).not_null())
                    .col(ColumnDef::new(Accounts::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::Description).text())
                    .col(ColumnDef::new(Accounts::AccountType).string_len(20).not_null())
                    .col(ColumnDef::new(Accounts::BalanceClass).string_len(20))
                    .col(ColumnDef::new(Accounts::ParentId).uuid())
                    .col(
                        ColumnDef::new(Accounts::Currency)
                            .string_len(3)
                            .not_null()
                            .default("MUR"),
                    )
                    .col(ColumnDef::new(Accounts::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Accounts::IsSystem).boolean().not_null().default(false))
                    .col(timestamp(Accounts::CreatedAt))
                    .col(timestamp(Accounts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_parent")
                            .from(Accounts::Table, Accounts::ParentId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_accounts_company_code")
                    .table(Accounts::Table)
                    .col(Accounts::TenantId)
                    .col(Accounts::CompanyId)
                    .col(Accounts::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: FISCAL PERIODS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(FiscalPeriods::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(FiscalPeriods::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(FiscalPeriods::TenantId).uuid().not_null())
                    .col(ColumnDef::new(FiscalPeriods::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(FiscalPeriods::Name).string_len(100).not_null())
                    .col(ColumnDef::new(FiscalPeriods::PeriodType).string_len(20).not_null())
                    .col(ColumnDef::new(FiscalPeriods::StartDate).date().not_null())
                    .col(ColumnDef::new(FiscalPeriods::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(FiscalPeriods::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(FiscalPeriods::ClosedAt).timestamp_with_time_zone())
                    .col(timestamp(FiscalPeriods::CreatedAt))
                    .col(timestamp(FiscalPeriods::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fiscal_periods_company_dates")
                    .table(FiscalPeriods::Table)
                    .col(FiscalPeriods::TenantId)
                    .col(FiscalPeriods::CompanyId)
                    .col(FiscalPeriods::StartDate)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: JOURNAL ENTRIES AND LINES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalEntries::TenantId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::PeriodId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryNumber).string_len(30).not_null())
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(JournalEntries::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(JournalEntries::Description).text().not_null())
                    .col(ColumnDef::new(JournalEntries::Reference).string_len(100))
                    .col(ColumnDef::new(JournalEntries::Source).string_len(100))
                    .col(money(JournalEntries::TotalDebit))
                    .col(money(JournalEntries::TotalCredit))
                    .col(ColumnDef::new(JournalEntries::CreatedBy).uuid())
                    .col(ColumnDef::new(JournalEntries::PostedBy).uuid())
                    .col(ColumnDef::new(JournalEntries::PostedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(JournalEntries::ReversedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(JournalEntries::ReversingEntryId).uuid())
                    .col(ColumnDef::new(JournalEntries::ReversalOfId).uuid())
                    .col(timestamp(JournalEntries::CreatedAt))
                    .col(timestamp(JournalEntries::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entries_period")
                            .from(JournalEntries::Table, JournalEntries::PeriodId)
                            .to(FiscalPeriods::Table, FiscalPeriods::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_journal_entries_company_number")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TenantId)
                    .col(JournalEntries::CompanyId)
                    .col(JournalEntries::EntryNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_company_date")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TenantId)
                    .col(JournalEntries::CompanyId)
                    .col(JournalEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalLines::EntryId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::LineNumber).integer().not_null())
                    .col(ColumnDef::new(JournalLines::AccountId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::Description).text())
                    .col(money(JournalLines::Debit))
                    .col(money(JournalLines::Credit))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_entry")
                            .from(JournalLines::Table, JournalLines::EntryId)
                            .to(JournalEntries::Table, JournalEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_account")
                            .from(JournalLines::Table, JournalLines::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_account")
                    .table(JournalLines::Table)
                    .col(JournalLines::AccountId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: NUMBER SEQUENCES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(NumberSequences::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(NumberSequences::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(NumberSequences::TenantId).uuid().not_null())
                    .col(ColumnDef::new(NumberSequences::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(NumberSequences::Scope).string_len(20).not_null())
                    .col(ColumnDef::new(NumberSequences::LastValue).integer().not_null())
                    .col(
                        ColumnDef::new(NumberSequences::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(timestamp(NumberSequences::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_number_sequences_scope")
                    .table(NumberSequences::Table)
                    .col(NumberSequences::TenantId)
                    .col(NumberSequences::CompanyId)
                    .col(NumberSequences::Scope)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NumberSequences::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalLines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FiscalPeriods::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

/// `DECIMAL(16,4)` money column defaulting to zero.
///
/// Sixteen digits is the widest precision the `SQLite` backend accepts.
pub(crate) fn money<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .decimal_len(16, 4)
        .not_null()
        .default(0)
        .to_owned()
}

/// Non-null timestamp column defaulting to the current time.
pub(crate) fn timestamp<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
pub(crate) enum Accounts {
    Table,
    Id,
    TenantId,
    CompanyId,
    Code,
    Name,
    Description,
    AccountType,
    BalanceClass,
    ParentId,
    Currency,
    IsActive,
    IsSystem,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FiscalPeriods {
    Table,
    Id,
    TenantId,
    CompanyId,
    Name,
    PeriodType,
    StartDate,
    EndDate,
    Status,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum JournalEntries {
    Table,
    Id,
    TenantId,
    CompanyId,
    PeriodId,
    EntryNumber,
    EntryDate,
    EntryType,
    Status,
    Description,
    Reference,
    Source,
    TotalDebit,
    TotalCredit,
    CreatedBy,
    PostedBy,
    PostedAt,
    ReversedAt,
    ReversingEntryId,
    ReversalOfId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JournalLines {
    Table,
    Id,
    EntryId,
    LineNumber,
    AccountId,
    Description,
    Debit,
    Credit,
}

#[derive(DeriveIden)]
enum NumberSequences {
    Table,
    Id,
    TenantId,
    CompanyId,
    Scope,
    LastValue,
    Version,
    UpdatedAt,
}
