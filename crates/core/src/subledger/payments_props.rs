//! Property-based tests for payment application.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::payments::apply_payment;
use super::types::DocumentStatus;

fn cents(range: std::ops::Range<i64>) -> impl Strategy<Value = Decimal> {
    range.prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Paying in instalments never exceeds the total and ends PAID exactly
    /// when the last cent is settled.
    #[test]
    fn prop_instalments_settle(total in cents(100..10_000_000), splits in prop::collection::vec(1u32..100, 1..8)) {
        let weight: u32 = splits.iter().sum();
        let mut paid = Decimal::ZERO;
        let mut status = DocumentStatus::Sent;

        for (i, split) in splits.iter().enumerate() {
            let amount = if i + 1 == splits.len() {
                total - paid
            } else {
                (total * Decimal::from(*split) / Decimal::from(weight))
                    .round_dp(2)
                    .min(total - paid)
            };
            if amount <= Decimal::ZERO {
                continue;
            }
            let outcome = apply_payment(status, total, paid, amount).unwrap();
            prop_assert!(outcome.paid_amount <= total);
            paid = outcome.paid_amount;
            status = outcome.status;
        }

        prop_assert_eq!(paid, total);
        prop_assert_eq!(status, DocumentStatus::Paid);
    }

    /// Anything above the remaining balance is rejected and changes nothing.
    #[test]
    fn prop_overpayment_rejected(total in cents(100..1_000_000), paid_pct in 0u32..100, extra in cents(1..100_000)) {
        let paid = (total * Decimal::from(paid_pct) / Decimal::ONE_HUNDRED).round_dp(2);
        let amount = total - paid + extra;
        prop_assert!(apply_payment(DocumentStatus::Partial, total, paid, amount).is_err());
    }
}
