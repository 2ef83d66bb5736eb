//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::bank_accounts::Entity as BankAccounts;
pub use super::bank_reconciliations::Entity as BankReconciliations;
pub use super::bank_transactions::Entity as BankTransactions;
pub use super::document_lines::Entity as DocumentLines;
pub use super::documents::Entity as Documents;
pub use super::fiscal_periods::Entity as FiscalPeriods;
pub use super::journal_entries::Entity as JournalEntries;
pub use super::journal_lines::Entity as JournalLines;
pub use super::number_sequences::Entity as NumberSequences;
pub use super::parties::Entity as Parties;
pub use super::payments::Entity as Payments;
pub use super::posting_settings::Entity as PostingSettings;
pub use super::statement_imports::Entity as StatementImports;
