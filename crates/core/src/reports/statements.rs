//! Trial balance, income statement and balance sheet.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::{DateRange, amounts_match};

use super::balances::totals_by_account;
use super::types::{
    AccountBalance, AccountRef, BalanceSheet, BalanceSheetSection, IncomeStatement, PostedLine,
    StatementLine, TrialBalance, TrialBalanceRow,
};
use crate::accounts::{AccountType, BalanceClass};

/// Splits each signed balance into the debit column (when `>= 0`) or the
/// credit column (when `< 0`).
#[must_use]
pub fn trial_balance(as_of: NaiveDate, balances: &[AccountBalance]) -> TrialBalance {
    let mut rows: Vec<TrialBalanceRow> = balances
        .iter()
        .map(|b| {
            let (debit, credit) = if b.balance >= Decimal::ZERO {
                (b.balance, Decimal::ZERO)
            } else {
                (Decimal::ZERO, -b.balance)
            };
            TrialBalanceRow {
                account_id: b.account_id,
                code: b.code.clone(),
                name: b.name.clone(),
                account_type: b.account_type,
                debit,
                credit,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code));

    let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
    let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

    TrialBalance {
        as_of,
        rows,
        total_debit,
        total_credit,
        is_balanced: amounts_match(total_debit, total_credit),
    }
}

/// Natural-sign statement lines for accounts of `account_type` with activity.
fn statement_lines<'a, I>(
    accounts: I,
    account_type: AccountType,
    lines: &[PostedLine],
    keep: impl Fn(&PostedLine) -> bool,
) -> Vec<(Option<BalanceClass>, StatementLine)>
where
    I: IntoIterator<Item = &'a AccountRef>,
{
    let totals = totals_by_account(lines, keep);
    let normal = account_type.normal_balance();

    let mut out: Vec<(Option<BalanceClass>, StatementLine)> = accounts
        .into_iter()
        .filter(|a| a.account_type == account_type)
        .filter_map(|account| {
            let (debit, credit) = totals.get(&account.id).copied()?;
            Some((
                account.balance_class,
                StatementLine {
                    account_id: account.id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    amount: normal.natural(debit - credit),
                },
            ))
        })
        .collect();
    out.sort_by(|a, b| a.1.code.cmp(&b.1.code));
    out
}

fn total(lines: &[StatementLine]) -> Decimal {
    lines.iter().map(|l| l.amount).sum()
}

/// Revenue and expenses over `range`, both as positive magnitudes on their
/// normal side, and net income as their difference.
#[must_use]
pub fn income_statement(range: DateRange, accounts: &[AccountRef], lines: &[PostedLine]) -> IncomeStatement {
    let in_range = |l: &PostedLine| range.contains(l.entry_date);

    let revenue: Vec<StatementLine> = statement_lines(accounts, AccountType::Revenue, lines, in_range)
        .into_iter()
        .map(|(_, line)| line)
        .collect();
    let expenses: Vec<StatementLine> = statement_lines(accounts, AccountType::Expense, lines, in_range)
        .into_iter()
        .map(|(_, line)| line)
        .collect();

    let total_revenue = total(&revenue);
    let total_expenses = total(&expenses);

    IncomeStatement {
        range,
        revenue,
        expenses,
        total_revenue,
        total_expenses,
        net_income: total_revenue - total_expenses,
    }
}

fn section(lines: Vec<(Option<BalanceClass>, StatementLine)>, account_type: AccountType) -> BalanceSheetSection {
    let mut out = BalanceSheetSection::default();
    for (class, line) in lines {
        match class.or(BalanceClass::default_for(account_type)) {
            Some(BalanceClass::NonCurrent) => out.non_current.push(line),
            Some(BalanceClass::Current) | None => out.current.push(line),
        }
    }
    out.total_current = total(&out.current);
    out.total_non_current = total(&out.non_current);
    out.total = out.total_current + out.total_non_current;
    out
}

/// Balance sheet as of `as_of`.
///
/// Assets and liabilities are bucketed by each account's balance class.
/// Retained earnings are the net income of everything dated on or before
/// `as_of`, taken from [`income_statement`] rather than from a stored figure.
#[must_use]
pub fn balance_sheet(as_of: NaiveDate, accounts: &[AccountRef], lines: &[PostedLine]) -> BalanceSheet {
    let through = |l: &PostedLine| l.entry_date <= as_of;

    let assets = section(
        statement_lines(accounts, AccountType::Asset, lines, through),
        AccountType::Asset,
    );
    let liabilities = section(
        statement_lines(accounts, AccountType::Liability, lines, through),
        AccountType::Liability,
    );
    let equity: Vec<StatementLine> = statement_lines(accounts, AccountType::Equity, lines, through)
        .into_iter()
        .map(|(_, line)| line)
        .collect();

    let to_date = DateRange {
        start: NaiveDate::MIN,
        end: as_of,
    };
    let retained_earnings = income_statement(to_date, accounts, lines).net_income;

    let total_equity = total(&equity) + retained_earnings;
    let total_liabilities_and_equity = liabilities.total + total_equity;

    BalanceSheet {
        as_of,
        is_balanced: amounts_match(assets.total, total_liabilities_and_equity),
        assets,
        liabilities,
        equity,
        retained_earnings,
        total_equity,
        total_liabilities_and_equity,
    }
}
