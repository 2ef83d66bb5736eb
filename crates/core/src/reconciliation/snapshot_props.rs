//! Property-based tests for reconciliation balances.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::snapshot::compute_snapshot;
use super::types::BankLine;

fn arb_bank_lines() -> impl Strategy<Value = Vec<BankLine>> {
    prop::collection::vec((1i64..10_000_000, any::<bool>(), any::<bool>(), 1u32..60), 0..20).prop_map(
        |rows| {
            rows.into_iter()
                .map(|(cents, is_debit, is_reconciled, day)| {
                    let amount = Decimal::new(cents, 2);
                    let date = NaiveDate::from_yo_opt(2026, day).unwrap();
                    let (debit, credit) = if is_debit {
                        (amount, Decimal::ZERO)
                    } else {
                        (Decimal::ZERO, amount)
                    };
                    BankLine {
                        id: Uuid::new_v4(),
                        transaction_date: date,
                        debit,
                        credit,
                        is_reconciled,
                    }
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A statement that equals the books plus outstanding items reconciles to zero.
    #[test]
    fn prop_consistent_statement_has_no_difference(
        lines in arb_bank_lines(),
        gl in -1_000_000i64..1_000_000,
        day in 1u32..60,
    ) {
        let statement_date = NaiveDate::from_yo_opt(2026, day).unwrap();
        let gl_balance = Decimal::new(gl, 2);
        let outstanding: Decimal = lines
            .iter()
            .filter(|l| !l.is_reconciled && l.transaction_date <= statement_date)
            .map(BankLine::net)
            .sum();

        let snapshot = compute_snapshot(statement_date, gl_balance + outstanding, gl_balance, &lines);
        prop_assert_eq!(snapshot.difference, Decimal::ZERO);
        prop_assert_eq!(snapshot.adjusted_gl_balance, snapshot.statement_balance);
    }

    /// Reconciled transactions never move the adjusted balance.
    #[test]
    fn prop_reconciled_lines_ignored(lines in arb_bank_lines(), statement in 0i64..1_000_000) {
        let statement_date = NaiveDate::from_yo_opt(2026, 59).unwrap();
        let statement_balance = Decimal::new(statement, 2);
        let open: Vec<BankLine> = lines.iter().copied().filter(|l| !l.is_reconciled).collect();

        prop_assert_eq!(
            compute_snapshot(statement_date, statement_balance, Decimal::ZERO, &lines),
            compute_snapshot(statement_date, statement_balance, Decimal::ZERO, &open)
        );
    }
}
