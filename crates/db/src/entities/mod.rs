//! `SeaORM` entity definitions.

pub mod prelude;

pub mod accounts;
pub mod bank_accounts;
pub mod bank_reconciliations;
pub mod bank_transactions;
pub mod document_lines;
pub mod documents;
pub mod fiscal_periods;
pub mod journal_entries;
pub mod journal_lines;
pub mod number_sequences;
pub mod parties;
pub mod payments;
pub mod posting_settings;
pub mod sea_orm_active_enums;
pub mod statement_imports;
