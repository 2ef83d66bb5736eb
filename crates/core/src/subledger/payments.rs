//! Applying payments to invoices and bills.

use rust_decimal::Decimal;
use tally_shared::types::amounts_match;

use super::error::SubledgerError;
use super::types::DocumentStatus;

/// Result of applying a payment to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// New paid amount.
    pub paid_amount: Decimal,
    /// Balance still owed.
    pub remaining: Decimal,
    /// New document status.
    pub status: DocumentStatus,
}

/// Balance still owed on a document.
#[must_use]
pub fn remaining(total: Decimal, paid: Decimal) -> Decimal {
    total - paid
}

/// PAID once the paid amount is within a cent of the total, else PARTIAL.
#[must_use]
pub fn settlement_status(total: Decimal, paid: Decimal) -> DocumentStatus {
    if amounts_match(paid, total) {
        DocumentStatus::Paid
    } else {
        DocumentStatus::Partial
    }
}

/// Applies `amount` to a document with the given status, total and paid amount.
///
/// # Errors
///
/// - `InvalidTransition` if the document is a draft, paid or cancelled
/// - `NonPositivePayment` if `amount <= 0`
/// - `Overpayment` if `amount` exceeds the remaining balance
pub fn apply_payment(
    status: DocumentStatus,
    total: Decimal,
    paid: Decimal,
    amount: Decimal,
) -> Result<PaymentOutcome, SubledgerError> {
    if !status.accepts_payment() {
        return Err(SubledgerError::InvalidTransition {
            status,
            action: "record a payment against",
        });
    }
    if amount <= Decimal::ZERO {
        return Err(SubledgerError::NonPositivePayment);
    }
    let owed = remaining(total, paid);
    if amount > owed {
        return Err(SubledgerError::Overpayment {
            amount,
            remaining: owed,
        });
    }

    let paid_amount = paid + amount;
    Ok(PaymentOutcome {
        paid_amount,
        remaining: remaining(total, paid_amount),
        status: settlement_status(total, paid_amount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_then_paid() {
        let first = apply_payment(DocumentStatus::Sent, dec!(1000), dec!(0), dec!(400)).unwrap();
        assert_eq!(first.status, DocumentStatus::Partial);
        assert_eq!(first.remaining, dec!(600));

        let second = apply_payment(first.status, dec!(1000), first.paid_amount, dec!(600)).unwrap();
        assert_eq!(second.status, DocumentStatus::Paid);
        assert_eq!(second.paid_amount, dec!(1000));
    }

    #[test]
    fn test_overpayment_rejected() {
        let err = apply_payment(DocumentStatus::Partial, dec!(1000), dec!(400), dec!(600.01)).unwrap_err();
        assert_eq!(
            err,
            SubledgerError::Overpayment {
                amount: dec!(600.01),
                remaining: dec!(600),
            }
        );
        assert_eq!(err.kind(), tally_shared::ErrorKind::BusinessRuleViolation);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-5))]
    fn test_non_positive_rejected(#[case] amount: Decimal) {
        assert_eq!(
            apply_payment(DocumentStatus::Approved, dec!(100), dec!(0), amount),
            Err(SubledgerError::NonPositivePayment)
        );
    }

    #[rstest]
    #[case(DocumentStatus::Draft)]
    #[case(DocumentStatus::Paid)]
    #[case(DocumentStatus::Cancelled)]
    fn test_status_must_accept_payment(#[case] status: DocumentStatus) {
        assert!(matches!(
            apply_payment(status, dec!(100), dec!(0), dec!(10)),
            Err(SubledgerError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_settlement_within_tolerance() {
        assert_eq!(settlement_status(dec!(100), dec!(99.995)), DocumentStatus::Paid);
        assert_eq!(settlement_status(dec!(100), dec!(99.99)), DocumentStatus::Partial);
    }
}
