//! Subledger document types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SubledgerError;
use crate::accounts::PostingRole;
use crate::ledger::{DocumentPrefix, JournalEntryType};

/// Receivable or payable side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Customer invoice (accounts receivable).
    Invoice,
    /// Supplier bill (accounts payable).
    Bill,
}

impl DocumentKind {
    /// Numbering prefix of the document.
    #[must_use]
    pub const fn prefix(self) -> DocumentPrefix {
        match self {
            Self::Invoice => DocumentPrefix::Invoice,
            Self::Bill => DocumentPrefix::Bill,
        }
    }

    /// Counterparty the document is issued to or received from.
    #[must_use]
    pub const fn party_kind(self) -> PartyKind {
        match self {
            Self::Invoice => PartyKind::Customer,
            Self::Bill => PartyKind::Supplier,
        }
    }

    /// Numbering prefix of payments against this kind of document.
    #[must_use]
    pub const fn payment_prefix(self) -> DocumentPrefix {
        match self {
            Self::Invoice => DocumentPrefix::CustomerPayment,
            Self::Bill => DocumentPrefix::SupplierPayment,
        }
    }

    /// Status a draft moves to when issued.
    #[must_use]
    pub const fn issued_status(self) -> DocumentStatus {
        match self {
            Self::Invoice => DocumentStatus::Sent,
            Self::Bill => DocumentStatus::Approved,
        }
    }

    /// Journal entry type used when the document is posted.
    #[must_use]
    pub const fn entry_type(self) -> JournalEntryType {
        match self {
            Self::Invoice => JournalEntryType::Sales,
            Self::Bill => JournalEntryType::Purchase,
        }
    }

    /// Journal entry type used when a payment against the document is posted.
    #[must_use]
    pub const fn payment_entry_type(self) -> JournalEntryType {
        match self {
            Self::Invoice => JournalEntryType::Receipt,
            Self::Bill => JournalEntryType::Disbursement,
        }
    }

    /// Lowercase name for messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Bill => "bill",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counterparty of a subledger document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    /// Billed through invoices.
    Customer,
    /// Paid through bills.
    Supplier,
}

impl PartyKind {
    /// Numbering prefix of the party's code.
    #[must_use]
    pub const fn prefix(self) -> DocumentPrefix {
        match self {
            Self::Customer => DocumentPrefix::Customer,
            Self::Supplier => DocumentPrefix::Supplier,
        }
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
        }
    }
}

/// Status of an invoice or bill.
///
/// Invoices use `Sent` and bills use `Approved` as their issued state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Being prepared.
    Draft,
    /// Invoice issued to the customer.
    Sent,
    /// Bill approved for payment.
    Approved,
    /// Partly paid.
    Partial,
    /// Fully paid.
    Paid,
    /// Past due with a balance outstanding.
    Overdue,
    /// Voided before any payment or posting.
    Cancelled,
}

impl DocumentStatus {
    /// Returns true if payments may be recorded against the document.
    #[must_use]
    pub const fn accepts_payment(self) -> bool {
        matches!(self, Self::Sent | Self::Approved | Self::Partial | Self::Overdue)
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Approved => "approved",
            Self::Partial => "partial",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Notes and coins.
    Cash,
    /// Bank transfer.
    BankTransfer,
    /// Cheque.
    Cheque,
    /// Debit or credit card.
    Card,
}

impl PaymentMethod {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Cheque => "cheque",
            Self::Card => "card",
        }
    }
}

/// A document line as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLineInput {
    /// What was sold or bought.
    pub description: String,
    /// Revenue (invoice) or expense (bill) account; the company default when absent.
    pub account_id: Option<Uuid>,
    /// Quantity, strictly positive.
    pub quantity: Decimal,
    /// Price per unit, non-negative.
    pub unit_price: Decimal,
    /// Tax rate in percent, 0 to 100.
    pub tax_rate: Decimal,
}

/// A document line with derived amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedLine {
    /// 1-based position.
    pub line_number: i32,
    /// What was sold or bought.
    pub description: String,
    /// Explicit revenue or expense account.
    pub account_id: Option<Uuid>,
    /// Quantity.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    /// `quantity * unit_price`, rounded to cents.
    pub subtotal: Decimal,
    /// `subtotal * tax_rate / 100`, rounded to cents.
    pub tax_amount: Decimal,
    /// `subtotal + tax_amount`.
    pub total: Decimal,
}

/// Document totals, sums of the rounded line amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Sum of line subtotals.
    pub subtotal: Decimal,
    /// Sum of line taxes.
    pub tax_total: Decimal,
    /// `subtotal + tax_total`.
    pub total: Decimal,
}

/// The company's default accounts for automatic postings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingAccounts {
    /// Accounts receivable.
    pub receivable: Option<Uuid>,
    /// Accounts payable.
    pub payable: Option<Uuid>,
    /// Default revenue account.
    pub sales: Option<Uuid>,
    /// Default expense account.
    pub purchases: Option<Uuid>,
    /// Output tax.
    pub tax_payable: Option<Uuid>,
    /// Input tax.
    pub tax_receivable: Option<Uuid>,
    /// Cash used when a payment names no bank account.
    pub cash: Option<Uuid>,
}

impl PostingAccounts {
    /// The account configured for `role`, if any.
    #[must_use]
    pub const fn get(&self, role: PostingRole) -> Option<Uuid> {
        match role {
            PostingRole::Receivable => self.receivable,
            PostingRole::Payable => self.payable,
            PostingRole::Sales => self.sales,
            PostingRole::Purchases => self.purchases,
            PostingRole::TaxPayable => self.tax_payable,
            PostingRole::TaxReceivable => self.tax_receivable,
            PostingRole::Cash => self.cash,
        }
    }

    /// Sets the account for `role`.
    pub fn set(&mut self, role: PostingRole, account_id: Uuid) {
        let slot = match role {
            PostingRole::Receivable => &mut self.receivable,
            PostingRole::Payable => &mut self.payable,
            PostingRole::Sales => &mut self.sales,
            PostingRole::Purchases => &mut self.purchases,
            PostingRole::TaxPayable => &mut self.tax_payable,
            PostingRole::TaxReceivable => &mut self.tax_receivable,
            PostingRole::Cash => &mut self.cash,
        };
        *slot = Some(account_id);
    }

    /// The account configured for `role`.
    ///
    /// # Errors
    ///
    /// Returns `MissingPostingAccount` if none is configured.
    pub fn require(&self, role: PostingRole) -> Result<Uuid, SubledgerError> {
        self.get(role).ok_or(SubledgerError::MissingPostingAccount(role))
    }
}
