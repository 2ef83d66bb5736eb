//! Property-based tests for report derivation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::balances::{account_balances, signed_balance};
use super::statements::{balance_sheet, trial_balance};
use super::types::{AccountRef, PostedLine};
use crate::accounts::{AccountType, BalanceClass};

fn chart() -> Vec<AccountRef> {
    let rows = [
        ("1000", AccountType::Asset, Some(BalanceClass::Current)),
        ("1200", AccountType::Asset, Some(BalanceClass::NonCurrent)),
        ("2000", AccountType::Liability, Some(BalanceClass::Current)),
        ("3000", AccountType::Equity, None),
        ("4000", AccountType::Revenue, None),
        ("6000", AccountType::Expense, None),
    ];
    rows
        .into_iter()
        .enumerate()
        .map(|(i, (code, account_type, balance_class))| AccountRef {
            id: Uuid::from_u128(i as u128 + 1),
            code: code.to_string(),
            name: code.to_string(),
            account_type,
            balance_class,
            is_active: true,
        })
        .collect()
}

/// Two-line balanced postings between random accounts of [`chart`].
fn arb_postings() -> impl Strategy<Value = Vec<PostedLine>> {
    prop::collection::vec((0usize..6, 0usize..6, 1i64..1_000_000, 1u32..365), 1..30).prop_map(
        |postings| {
            let accounts = chart();
            let mut lines = Vec::new();
            for (n, (from, to, cents, day)) in postings.into_iter().enumerate() {
                let amount = Decimal::new(cents, 2);
                let date = NaiveDate::from_yo_opt(2026, day).unwrap();
                let number = format!("JE-2026-{:05}", n + 1);
                let entry_id = Uuid::new_v4();
                for (line_number, account, debit, credit) in [
                    (1, accounts[from].id, amount, Decimal::ZERO),
                    (2, accounts[to].id, Decimal::ZERO, amount),
                ] {
                    lines.push(PostedLine {
                        entry_id,
                        entry_number: number.clone(),
                        entry_date: date,
                        line_number,
                        account_id: account,
                        description: None,
                        debit,
                        credit,
                    });
                }
            }
            lines
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balanced postings always produce a balanced trial balance.
    #[test]
    fn prop_trial_balance_columns_agree(lines in arb_postings()) {
        let balances = account_balances(&chart(), &lines);
        let tb = trial_balance(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(), &balances);

        prop_assert_eq!(tb.total_debit, tb.total_credit);
        prop_assert!(tb.is_balanced);
    }

    /// Every account balance equals the signed sum of its lines.
    #[test]
    fn prop_balance_is_signed_sum(lines in arb_postings()) {
        for balance in account_balances(&chart(), &lines) {
            prop_assert_eq!(balance.balance, signed_balance(&lines, balance.account_id, None));
        }
    }

    /// With retained earnings folded in, the balance sheet always balances.
    #[test]
    fn prop_balance_sheet_balances(lines in arb_postings(), day in 1u32..365) {
        let as_of = NaiveDate::from_yo_opt(2026, day).unwrap();
        let bs = balance_sheet(as_of, &chart(), &lines);

        prop_assert_eq!(bs.assets.total, bs.total_liabilities_and_equity);
        prop_assert!(bs.is_balanced);
    }
}
