//! Journal lines that post subledger documents to the ledger.
//!
//! Invoice: debit receivable for the total, credit each line's revenue
//! account for its subtotal, credit tax payable for the tax.
//! Bill: the mirror image against payable, expense and tax receivable.
//! Payment: cash against the receivable or payable control account.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::SubledgerError;
use super::types::{ComputedLine, DocumentKind, DocumentTotals, PostingAccounts};
use crate::accounts::PostingRole;
use crate::ledger::{JournalEntryType, JournalLineInput};

/// A journal entry ready to be created and posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingDraft {
    /// Entry type.
    pub entry_type: JournalEntryType,
    /// Entry description.
    pub description: String,
    /// Source document number.
    pub reference: String,
    /// Entry lines.
    pub lines: Vec<JournalLineInput>,
}

fn side(kind: DocumentKind, account_id: Uuid, amount: Decimal, control: bool) -> JournalLineInput {
    // Invoices debit the control account; bills credit it.
    let debit_control = kind == DocumentKind::Invoice;
    if control == debit_control {
        JournalLineInput::debit(account_id, amount)
    } else {
        JournalLineInput::credit(account_id, amount)
    }
}

fn document_posting(
    kind: DocumentKind,
    number: &str,
    party_name: &str,
    lines: &[ComputedLine],
    totals: &DocumentTotals,
    accounts: &PostingAccounts,
) -> Result<PostingDraft, SubledgerError> {
    let (control_role, default_role, tax_role) = match kind {
        DocumentKind::Invoice => (PostingRole::Receivable, PostingRole::Sales, PostingRole::TaxPayable),
        DocumentKind::Bill => (PostingRole::Payable, PostingRole::Purchases, PostingRole::TaxReceivable),
    };

    let control = accounts.require(control_role)?;
    let mut journal = vec![side(kind, control, totals.total, true).with_description(number)];

    for line in lines.iter().filter(|l| !l.subtotal.is_zero()) {
        let account = match line.account_id {
            Some(id) => id,
            None => accounts.require(default_role)?,
        };
        journal.push(side(kind, account, line.subtotal, false).with_description(line.description.clone()));
    }

    if !totals.tax_total.is_zero() {
        let tax = accounts.require(tax_role)?;
        journal.push(side(kind, tax, totals.tax_total, false).with_description("Tax"));
    }

    let description = match kind {
        DocumentKind::Invoice => format!("Invoice {number} to {party_name}"),
        DocumentKind::Bill => format!("Bill {number} from {party_name}"),
    };

    Ok(PostingDraft {
        entry_type: kind.entry_type(),
        description,
        reference: number.to_string(),
        lines: journal,
    })
}

/// Lines posting a customer invoice.
///
/// # Errors
///
/// Returns `MissingPostingAccount` when a default account is needed but not configured.
pub fn invoice_posting(
    number: &str,
    customer_name: &str,
    lines: &[ComputedLine],
    totals: &DocumentTotals,
    accounts: &PostingAccounts,
) -> Result<PostingDraft, SubledgerError> {
    document_posting(DocumentKind::Invoice, number, customer_name, lines, totals, accounts)
}

/// Lines posting a supplier bill.
///
/// # Errors
///
/// Returns `MissingPostingAccount` when a default account is needed but not configured.
pub fn bill_posting(
    number: &str,
    supplier_name: &str,
    lines: &[ComputedLine],
    totals: &DocumentTotals,
    accounts: &PostingAccounts,
) -> Result<PostingDraft, SubledgerError> {
    document_posting(DocumentKind::Bill, number, supplier_name, lines, totals, accounts)
}

/// Lines posting a payment against an invoice or bill.
///
/// Customer payments debit `cash_account` and credit receivable; supplier
/// payments debit payable and credit `cash_account`.
///
/// # Errors
///
/// Returns `MissingPostingAccount` if the control account is not configured.
pub fn payment_posting(
    kind: DocumentKind,
    payment_number: &str,
    document_number: &str,
    amount: Decimal,
    cash_account: Uuid,
    accounts: &PostingAccounts,
) -> Result<PostingDraft, SubledgerError> {
    let (lines, description) = match kind {
        DocumentKind::Invoice => {
            let receivable = accounts.require(PostingRole::Receivable)?;
            (
                vec![
                    JournalLineInput::debit(cash_account, amount),
                    JournalLineInput::credit(receivable, amount),
                ],
                format!("Payment {payment_number} received for {document_number}"),
            )
        }
        DocumentKind::Bill => {
            let payable = accounts.require(PostingRole::Payable)?;
            (
                vec![
                    JournalLineInput::debit(payable, amount),
                    JournalLineInput::credit(cash_account, amount),
                ],
                format!("Payment {payment_number} made for {document_number}"),
            )
        }
    };

    Ok(PostingDraft {
        entry_type: kind.payment_entry_type(),
        description,
        reference: payment_number.to_string(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::validate_lines;
    use crate::subledger::totals::compute_lines;
    use crate::subledger::types::DocumentLineInput;
    use rust_decimal_macros::dec;

    fn accounts() -> PostingAccounts {
        let mut accounts = PostingAccounts::default();
        for (i, role) in [
            PostingRole::Receivable,
            PostingRole::Payable,
            PostingRole::Sales,
            PostingRole::Purchases,
            PostingRole::TaxPayable,
            PostingRole::TaxReceivable,
            PostingRole::Cash,
        ]
        .into_iter()
        .enumerate()
        {
            accounts.set(role, Uuid::from_u128(i as u128 + 1));
        }
        accounts
    }

    fn doc_lines(consulting: Option<Uuid>) -> (Vec<ComputedLine>, DocumentTotals) {
        compute_lines(vec![
            DocumentLineInput {
                description: "Consulting".into(),
                account_id: consulting,
                quantity: dec!(10),
                unit_price: dec!(100),
                tax_rate: dec!(15),
            },
            DocumentLineInput {
                description: "Travel".into(),
                account_id: None,
                quantity: dec!(1),
                unit_price: dec!(200),
                tax_rate: dec!(0),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_invoice_posting() {
        let accounts = accounts();
        let services = Uuid::new_v4();
        let (lines, totals) = doc_lines(Some(services));

        let draft = invoice_posting("INV-2026-00001", "Acme", &lines, &totals, &accounts).unwrap();

        assert_eq!(draft.entry_type, JournalEntryType::Sales);
        assert_eq!(draft.reference, "INV-2026-00001");
        assert_eq!(draft.lines[0], JournalLineInput::debit(accounts.receivable.unwrap(), dec!(1350)).with_description("INV-2026-00001"));
        assert_eq!(draft.lines[1].account_id, services);
        assert_eq!(draft.lines[1].credit, dec!(1000));
        assert_eq!(draft.lines[2].account_id, accounts.sales.unwrap());
        assert_eq!(draft.lines[3].account_id, accounts.tax_payable.unwrap());
        assert_eq!(draft.lines[3].credit, dec!(150));
        assert!(validate_lines(&draft.lines).is_ok());
    }

    #[test]
    fn test_bill_posting_mirrors_invoice() {
        let accounts = accounts();
        let (lines, totals) = doc_lines(None);

        let draft = bill_posting("BILL-2026-00001", "Supplier", &lines, &totals, &accounts).unwrap();

        assert_eq!(draft.entry_type, JournalEntryType::Purchase);
        assert_eq!(draft.lines[0].account_id, accounts.payable.unwrap());
        assert_eq!(draft.lines[0].credit, dec!(1350));
        assert_eq!(draft.lines[1].account_id, accounts.purchases.unwrap());
        assert_eq!(draft.lines[1].debit, dec!(1000));
        assert_eq!(draft.lines[3].account_id, accounts.tax_receivable.unwrap());
        assert_eq!(draft.lines[3].debit, dec!(150));
        assert!(validate_lines(&draft.lines).is_ok());
    }

    #[test]
    fn test_missing_default_account() {
        let mut accounts = accounts();
        accounts.sales = None;
        let (lines, totals) = doc_lines(None);

        assert_eq!(
            invoice_posting("INV-2026-00001", "Acme", &lines, &totals, &accounts),
            Err(SubledgerError::MissingPostingAccount(PostingRole::Sales))
        );
    }

    #[test]
    fn test_payment_posting() {
        let accounts = accounts();
        let bank = Uuid::new_v4();

        let receipt = payment_posting(DocumentKind::Invoice, "PMT-2026-00001", "INV-2026-00001", dec!(500), bank, &accounts).unwrap();
        assert_eq!(receipt.entry_type, JournalEntryType::Receipt);
        assert_eq!(receipt.lines[0], JournalLineInput::debit(bank, dec!(500)));
        assert_eq!(receipt.lines[1], JournalLineInput::credit(accounts.receivable.unwrap(), dec!(500)));

        let disbursement = payment_posting(DocumentKind::Bill, "APPMT-2026-00001", "BILL-2026-00001", dec!(75), bank, &accounts).unwrap();
        assert_eq!(disbursement.entry_type, JournalEntryType::Disbursement);
        assert_eq!(disbursement.lines[0], JournalLineInput::debit(accounts.payable.unwrap(), dec!(75)));
        assert_eq!(disbursement.lines[1], JournalLineInput::credit(bank, dec!(75)));
    }
}
