//! Property-based tests for journal line validation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::JournalLineInput;
use super::validation::validate_lines;

/// Amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A balanced entry: several debits and a single balancing credit.
fn balanced_lines() -> impl Strategy<Value = Vec<JournalLineInput>> {
    prop::collection::vec(positive_amount(), 1..6).prop_map(|debits| {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<_> = debits
            .into_iter()
            .map(|amount| JournalLineInput::debit(Uuid::new_v4(), amount))
            .collect();
        lines.push(JournalLineInput::credit(Uuid::new_v4(), total));
        lines
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balanced entries validate and report equal totals.
    #[test]
    fn prop_balanced_lines_accepted(lines in balanced_lines()) {
        let totals = validate_lines(&lines).unwrap();
        prop_assert_eq!(totals.debit, totals.credit);
        prop_assert!(totals.is_balanced);
    }

    /// Any imbalance of a cent or more is rejected with both totals.
    #[test]
    fn prop_imbalance_rejected(lines in balanced_lines(), extra in positive_amount()) {
        let mut lines = lines;
        lines[0].debit += extra;
        let debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = lines.iter().map(|l| l.credit).sum();

        prop_assert_eq!(
            validate_lines(&lines),
            Err(LedgerError::Unbalanced { debit, credit })
        );
    }

    /// A line with amounts on both sides never validates.
    #[test]
    fn prop_two_sided_line_rejected(lines in balanced_lines(), amount in positive_amount()) {
        let mut lines = lines;
        let last = lines.len() - 1;
        lines[last].debit = amount;
        lines[last].credit += amount;

        prop_assert_eq!(validate_lines(&lines), Err(LedgerError::BothSides(last + 1)));
    }

    /// A line with nothing on either side never validates.
    #[test]
    fn prop_empty_line_rejected(lines in balanced_lines()) {
        let mut lines = lines;
        lines.insert(0, JournalLineInput::debit(Uuid::new_v4(), Decimal::ZERO));

        prop_assert_eq!(validate_lines(&lines), Err(LedgerError::ZeroLine(1)));
    }
}
