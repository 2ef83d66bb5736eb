//! Reconciliation balances and completion checks.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::is_effectively_zero;
use uuid::Uuid;

use super::error::ReconciliationError;
use super::types::{BankLine, ReconciliationSnapshot, ReconciliationStatus};

/// Computes the balances recorded when a reconciliation starts.
///
/// The adjusted balance is the ledger balance plus every unreconciled bank
/// transaction dated on or before the statement date: activity the bank has
/// seen that the books do not yet reflect.
#[must_use]
pub fn compute_snapshot(
    statement_date: NaiveDate,
    statement_balance: Decimal,
    gl_balance: Decimal,
    transactions: &[BankLine],
) -> ReconciliationSnapshot {
    let outstanding: Decimal = transactions
        .iter()
        .filter(|t| !t.is_reconciled && t.transaction_date <= statement_date)
        .map(BankLine::net)
        .sum();
    let adjusted_gl_balance = gl_balance + outstanding;

    ReconciliationSnapshot {
        statement_balance,
        gl_balance,
        adjusted_gl_balance,
        difference: statement_balance - adjusted_gl_balance,
    }
}

/// A reconciliation completes once nothing up to the statement date is
/// unmatched and the recorded difference is below a cent.
pub fn ensure_completable(
    reconciliation_id: Uuid,
    status: ReconciliationStatus,
    unreconciled_count: u64,
    difference: Decimal,
) -> Result<(), ReconciliationError> {
    if status == ReconciliationStatus::Completed {
        return Err(ReconciliationError::ReconciliationCompleted(reconciliation_id));
    }
    if unreconciled_count > 0 {
        return Err(ReconciliationError::UnreconciledRemaining(unreconciled_count));
    }
    if !is_effectively_zero(difference) {
        return Err(ReconciliationError::DifferenceNotResolved(difference));
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

    fn txn(date: NaiveDate, debit: Decimal, credit: Decimal, is_reconciled: bool) -> BankLine {
        BankLine {
            id: Uuid::new_v4(),
            transaction_date: date,
            debit,
            credit,
            is_reconciled,
        }
    }

    #[test]
    fn test_outstanding_deposit_closes_gap() {
        let snapshot = compute_snapshot(
            d(3, 31),
            dec!(1000),
            dec!(950),
            &[txn(d(3, 30), dec!(50), Decimal::ZERO, false)],
        );
        assert_eq!(snapshot.adjusted_gl_balance, dec!(1000));
        assert_eq!(snapshot.difference, Decimal::ZERO);
    }

    #[test]
    fn test_ignores_reconciled_and_later_transactions() {
        let snapshot = compute_snapshot(
            d(3, 31),
            dec!(1000),
            dec!(900),
            &[
                txn(d(3, 5), dec!(70), Decimal::ZERO, true),
                txn(d(4, 1), dec!(100), Decimal::ZERO, false),
                txn(d(3, 31), Decimal::ZERO, dec!(25), false),
            ],
        );
        assert_eq!(snapshot.adjusted_gl_balance, dec!(875));
        assert_eq!(snapshot.difference, dec!(125));
    }

    #[test]
    fn test_completion_guards() {
        let id = Uuid::new_v4();
        assert!(ensure_completable(id, ReconciliationStatus::InProgress, 0, dec!(0.004)).is_ok());
        assert_eq!(
            ensure_completable(id, ReconciliationStatus::InProgress, 2, Decimal::ZERO),
            Err(ReconciliationError::UnreconciledRemaining(2))
        );
        assert_eq!(
            ensure_completable(id, ReconciliationStatus::InProgress, 0, dec!(0.01)),
            Err(ReconciliationError::DifferenceNotResolved(dec!(0.01)))
        );
        assert_eq!(
            ensure_completable(id, ReconciliationStatus::Completed, 0, Decimal::ZERO),
            Err(ReconciliationError::ReconciliationCompleted(id))
        );
    }
}
