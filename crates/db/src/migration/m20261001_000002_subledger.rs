//! Subledger tables: posting settings, customers and suppliers, invoices and
//! bills with their lines, and payments.

use sea_orm_migration::prelude::*;

use super::m20261001_000001_ledger::{Accounts, JournalEntries, money, timestamp};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: POSTING SETTINGS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(PostingSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostingSettings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(PostingSettings::TenantId).uuid().not_null())
                    .col(ColumnDef::new(PostingSettings::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(PostingSettings::ReceivableAccountId).uuid())
                    .col(ColumnDef::new(PostingSettings::PayableAccountId).uuid())
                    .col(ColumnDef::new(PostingSettings::SalesAccountId).uuid())
                    .col(ColumnDef::new(PostingSettings::PurchasesAccountId).uuid())
                    .col(ColumnDef::new(PostingSettings::TaxPayableAccountId).uuid())
                    .col(ColumnDef::new(PostingSettings::TaxReceivableAccountId).uuid())
                    .col(ColumnDef::new(PostingSettings::CashAccountId).uuid())
                    .col(timestamp(PostingSettings::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_posting_settings_company")
                    .table(PostingSettings::Table)
                    .col(PostingSettings::TenantId)
                    .col(PostingSettings::CompanyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: CUSTOMERS AND SUPPLIERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Parties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Parties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Parties::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Parties::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Parties::Kind).string_len(20).not_null())
                    .col(ColumnDef::new(Parties::Code).string_len(30).not_null())
                    .col(ColumnDef::new(Parties::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Parties::Email).string_len(255))
                    .col(ColumnDef::new(Parties::Currency).string_len(3).not_null().default("MUR"))
                    .col(ColumnDef::new(Parties::IsActive).boolean().not_null().default(true))
                    .col(timestamp(Parties::CreatedAt))
                    .col(timestamp(Parties::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_parties_company_code")
                    .table(Parties::Table)
                    .col(Parties::TenantId)
                    .col(Parties::CompanyId)
                    .col(Parties::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: INVOICES AND BILLS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Documents::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Documents::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Documents::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Documents::Kind).string_len(20).not_null())
                    .col(ColumnDef::new(Documents::Number).string_len(30).not_null())
                    .col(ColumnDef::new(Documents::PartyId).uuid().not_null())
                    .col(ColumnDef::new(Documents::IssueDate).date().not_null())
                    .col(ColumnDef::new(Documents::DueDate).date().not_null())
                    .col(ColumnDef::new(Documents::Currency).string_len(3).not_null())
                    .col(
                        ColumnDef::new(Documents::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(money(Documents::Subtotal))
                    .col(money(Documents::TaxTotal))
                    .col(money(Documents::Total))
                    .col(money(Documents::PaidAmount))
                    .col(ColumnDef::new(Documents::Version).integer().not_null().default(0))
                    .col(ColumnDef::new(Documents::JournalEntryId).uuid())
                    .col(ColumnDef::new(Documents::Notes).text())
                    .col(timestamp(Documents::CreatedAt))
                    .col(timestamp(Documents::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_party")
                            .from(Documents::Table, Documents::PartyId)
                            .to(Parties::Table, Parties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_documents_journal_entry")
                            .from(Documents::Table, Documents::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_documents_company_number")
                    .table(Documents::Table)
                    .col(Documents::TenantId)
                    .col(Documents::CompanyId)
                    .col(Documents::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DocumentLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DocumentLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(DocumentLines::DocumentId).uuid().not_null())
                    .col(ColumnDef::new(DocumentLines::LineNumber).integer().not_null())
                    .col(ColumnDef::new(DocumentLines::Description).text().not_null())
                    .col(ColumnDef::new(DocumentLines::AccountId).uuid())
                    .col(money(DocumentLines::Quantity))
                    .col(money(DocumentLines::UnitPrice))
                    .col(money(DocumentLines::TaxRate))
                    .col(money(DocumentLines::Subtotal))
                    .col(money(DocumentLines::TaxAmount))
                    .col(money(DocumentLines::Total))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_lines_document")
                            .from(DocumentLines::Table, DocumentLines::DocumentId)
                            .to(Documents::Table, Documents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_lines_account")
                            .from(DocumentLines::Table, DocumentLines::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: PAYMENTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Payments::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Payments::Kind).string_len(20).not_null())
                    .col(ColumnDef::new(Payments::Number).string_len(30).not_null())
                    .col(ColumnDef::new(Payments::DocumentId).uuid().not_null())
                    .col(ColumnDef::new(Payments::PaymentDate).date().not_null())
                    .col(money(Payments::Amount))
                    .col(ColumnDef::new(Payments::Method).string_len(20).not_null())
                    .col(ColumnDef::new(Payments::Reference).string_len(100))
                    .col(ColumnDef::new(Payments::BankAccountId).uuid())
                    .col(ColumnDef::new(Payments::JournalEntryId).uuid())
                    .col(timestamp(Payments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_document")
                            .from(Payments::Table, Payments::DocumentId)
                            .to(Documents::Table, Documents::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_journal_entry")
                            .from(Payments::Table, Payments::JournalEntryId)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_payments_company_number")
                    .table(Payments::Table)
                    .col(Payments::TenantId)
                    .col(Payments::CompanyId)
                    .col(Payments::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DocumentLines::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Documents::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Parties::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PostingSettings::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum PostingSettings {
    Table,
    Id,
    TenantId,
    CompanyId,
    ReceivableAccountId,
    PayableAccountId,
    SalesAccountId,
    PurchasesAccountId,
    TaxPayableAccountId,
    TaxReceivableAccountId,
    CashAccountId,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Parties {
    Table,
    Id,
    TenantId,
    CompanyId,
    Kind,
    Code,
    Name,
    Email,
    Currency,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
    TenantId,
    CompanyId,
    Kind,
    Number,
    PartyId,
    IssueDate,
    DueDate,
    Currency,
    Status,
    Subtotal,
    TaxTotal,
    Total,
    PaidAmount,
    Version,
    JournalEntryId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum DocumentLines {
    Table,
    Id,
    DocumentId,
    LineNumber,
    Description,
    AccountId,
    Quantity,
    UnitPrice,
    TaxRate,
    Subtotal,
    TaxAmount,
    Total,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    TenantId,
    CompanyId,
    Kind,
    Number,
    DocumentId,
    PaymentDate,
    Amount,
    Method,
    Reference,
    BankAccountId,
    JournalEntryId,
    CreatedAt,
}
