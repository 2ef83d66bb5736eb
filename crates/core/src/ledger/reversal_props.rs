//! Property-based tests for reversal construction.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::reversal::build_reversal;
use super::types::PreparedLine;
use super::validation::validate_lines;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// A balanced posted entry: debits followed by one balancing credit.
fn arb_posted_lines() -> impl Strategy<Value = Vec<PreparedLine>> {
    prop::collection::vec(arb_amount(), 1..5).prop_map(|debits| {
        let total: Decimal = debits.iter().copied().sum();
        let mut lines: Vec<PreparedLine> = debits
            .into_iter()
            .map(|amount| (amount, Decimal::ZERO))
            .chain(std::iter::once((Decimal::ZERO, total)))
            .zip(1..)
            .map(|((debit, credit), line_number)| PreparedLine {
                line_number,
                account_id: Uuid::new_v4(),
                debit,
                credit,
                description: None,
            })
            .collect();
        lines.reverse();
        lines
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Line i of the mirror carries the credit of line i as debit and vice versa.
    #[test]
    fn prop_mirror_swaps_each_line(original in arb_posted_lines()) {
        let draft = build_reversal("JE-2026-00001", &original, None);
        let mut ordered = original.clone();
        ordered.sort_by_key(|l| l.line_number);

        prop_assert_eq!(draft.lines.len(), ordered.len());
        for (mirror, line) in draft.lines.iter().zip(&ordered) {
            prop_assert_eq!(mirror.account_id, line.account_id);
            prop_assert_eq!(mirror.debit, line.credit);
            prop_assert_eq!(mirror.credit, line.debit);
        }
    }

    /// The mirror of a balanced entry is itself a valid balanced entry.
    #[test]
    fn prop_mirror_is_valid(original in arb_posted_lines()) {
        let draft = build_reversal("JE-2026-00001", &original, None);
        prop_assert!(validate_lines(&draft.lines).is_ok());
    }

    /// Original plus mirror nets every account to zero.
    #[test]
    fn prop_original_and_mirror_cancel(original in arb_posted_lines()) {
        let draft = build_reversal("JE-2026-00001", &original, None);
        for line in &original {
            let net: Decimal = draft
                .lines
                .iter()
                .filter(|m| m.account_id == line.account_id)
                .map(|m| m.debit - m.credit)
                .sum::<Decimal>()
                + line.debit
                - line.credit;
            prop_assert_eq!(net, Decimal::ZERO);
        }
    }
}
