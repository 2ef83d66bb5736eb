//! Invoice and bill status transitions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::SubledgerError;
use super::types::{DocumentKind, DocumentStatus};

/// DRAFT → SENT for invoices, DRAFT → APPROVED for bills.
pub fn issue(kind: DocumentKind, status: DocumentStatus) -> Result<DocumentStatus, SubledgerError> {
    match status {
        DocumentStatus::Draft => Ok(kind.issued_status()),
        _ => Err(SubledgerError::InvalidTransition {
            status,
            action: match kind {
                DocumentKind::Invoice => "send",
                DocumentKind::Bill => "approve",
            },
        }),
    }
}

/// Cancels a document that has neither payments nor a journal entry.
pub fn cancel(
    status: DocumentStatus,
    paid_amount: Decimal,
    journal_entry_id: Option<Uuid>,
) -> Result<DocumentStatus, SubledgerError> {
    if let Some(entry_id) = journal_entry_id {
        return Err(SubledgerError::AlreadyPosted(entry_id));
    }
    let cancellable = matches!(
        status,
        DocumentStatus::Draft | DocumentStatus::Sent | DocumentStatus::Approved | DocumentStatus::Overdue
    );
    if !cancellable || !paid_amount.is_zero() {
        return Err(SubledgerError::InvalidTransition {
            status,
            action: "cancel",
        });
    }
    Ok(DocumentStatus::Cancelled)
}

/// Returns true if an issued, unpaid document is past its due date.
#[must_use]
pub fn is_overdue(status: DocumentStatus, due_date: NaiveDate, as_of: NaiveDate) -> bool {
    matches!(
        status,
        DocumentStatus::Sent | DocumentStatus::Approved | DocumentStatus::Partial
    ) && due_date < as_of
}

/// A document is posted once, and only after it has been issued.
pub fn ensure_postable(
    status: DocumentStatus,
    journal_entry_id: Option<Uuid>,
) -> Result<(), SubledgerError> {
    if let Some(entry_id) = journal_entry_id {
        return Err(SubledgerError::AlreadyPosted(entry_id));
    }
    if matches!(status, DocumentStatus::Draft | DocumentStatus::Cancelled) {
        return Err(SubledgerError::InvalidTransition {
            status,
            action: "post",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    #[test]
    fn test_issue() {
        assert_eq!(issue(DocumentKind::Invoice, DocumentStatus::Draft), Ok(DocumentStatus::Sent));
        assert_eq!(issue(DocumentKind::Bill, DocumentStatus::Draft), Ok(DocumentStatus::Approved));
        assert_eq!(
            issue(DocumentKind::Bill, DocumentStatus::Approved),
            Err(SubledgerError::InvalidTransition {
                status: DocumentStatus::Approved,
                action: "approve",
            })
        );
    }

    #[test]
    fn test_cancel_guards() {
        assert_eq!(cancel(DocumentStatus::Sent, dec!(0), None), Ok(DocumentStatus::Cancelled));
        assert!(cancel(DocumentStatus::Partial, dec!(10), None).is_err());
        assert!(cancel(DocumentStatus::Cancelled, dec!(0), None).is_err());

        let entry = Uuid::new_v4();
        assert_eq!(
            cancel(DocumentStatus::Sent, dec!(0), Some(entry)),
            Err(SubledgerError::AlreadyPosted(entry))
        );
    }

    #[test]
    fn test_overdue() {
        assert!(is_overdue(DocumentStatus::Sent, d(1, 31), d(2, 1)));
        assert!(is_overdue(DocumentStatus::Partial, d(1, 31), d(2, 1)));
        assert!(!is_overdue(DocumentStatus::Sent, d(1, 31), d(1, 31)));
        assert!(!is_overdue(DocumentStatus::Paid, d(1, 31), d(3, 1)));
        assert!(!is_overdue(DocumentStatus::Draft, d(1, 31), d(3, 1)));
    }

    #[test]
    fn test_posting_is_one_time() {
        assert!(ensure_postable(DocumentStatus::Sent, None).is_ok());
        assert!(ensure_postable(DocumentStatus::Paid, None).is_ok());
        assert!(matches!(
            ensure_postable(DocumentStatus::Draft, None),
            Err(SubledgerError::InvalidTransition { .. })
        ));
        let entry = Uuid::new_v4();
        assert_eq!(
            ensure_postable(DocumentStatus::Sent, Some(entry)),
            Err(SubledgerError::AlreadyPosted(entry))
        );
    }
}
