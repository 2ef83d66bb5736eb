//! Account balances, general ledger listing and account activity.

use std::collections::HashMap;
use std::hash::BuildHasher;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_shared::types::DateRange;
use uuid::Uuid;

use super::types::{AccountActivity, AccountBalance, AccountRef, LedgerRow, PostedLine};

/// Debit and credit totals per account over the lines `keep` accepts.
pub(crate) fn totals_by_account<F>(lines: &[PostedLine], keep: F) -> HashMap<Uuid, (Decimal, Decimal)>
where
    F: Fn(&PostedLine) -> bool,
{
    let mut totals: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
    for line in lines {
        if !keep(line) {
            continue;
        }
        let entry = totals.entry(line.account_id).or_default();
        entry.0 += line.debit;
        entry.1 += line.credit;
    }
    totals
}

/// Signed `debit - credit` over an account's lines dated on or before `as_of`.
#[must_use]
pub fn signed_balance(lines: &[PostedLine], account_id: Uuid, as_of: Option<NaiveDate>) -> Decimal {
    lines
        .iter()
        .filter(|l| l.account_id == account_id)
        .filter(|l| as_of.is_none_or(|d| l.entry_date <= d))
        .map(PostedLine::net)
        .sum()
}

/// Balances of active accounts that have any activity, in code order.
#[must_use]
pub fn account_balances(accounts: &[AccountRef], lines: &[PostedLine]) -> Vec<AccountBalance> {
    let active: Vec<AccountRef> = accounts.iter().filter(|a| a.is_active).cloned().collect();
    ledger_balances(&active, lines)
}

/// Balances of every account that has any activity, in code order.
///
/// Deactivated accounts keep their history, so totals over the whole ledger
/// (the trial balance) must include them.
#[must_use]
pub fn ledger_balances(accounts: &[AccountRef], lines: &[PostedLine]) -> Vec<AccountBalance> {
    let totals = totals_by_account(lines, |_| true);

    let mut balances: Vec<AccountBalance> = accounts
        .iter()
        .filter_map(|account| {
            let (total_debit, total_credit) = totals.get(&account.id).copied()?;
            if total_debit.is_zero() && total_credit.is_zero() {
                return None;
            }
            Some(AccountBalance {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                account_type: account.account_type,
                balance_class: account.balance_class,
                total_debit,
                total_credit,
                balance: total_debit - total_credit,
            })
        })
        .collect();
    balances.sort_by(|a, b| a.code.cmp(&b.code));
    balances
}

/// Orders lines by entry date, entry number and line number, and attaches
/// each account's running balance.
///
/// `opening` seeds the running balance of each account with its balance on
/// the day before the listing starts; accounts absent from it start at zero.
#[must_use]
pub fn general_ledger<S: BuildHasher>(
    mut lines: Vec<PostedLine>,
    opening: &HashMap<Uuid, Decimal, S>,
) -> Vec<LedgerRow> {
    lines.sort_by(|a, b| {
        a.entry_date
            .cmp(&b.entry_date)
            .then_with(|| a.entry_number.cmp(&b.entry_number))
            .then_with(|| a.line_number.cmp(&b.line_number))
    });

    let mut running: HashMap<Uuid, Decimal> = HashMap::new();
    lines
        .into_iter()
        .map(|line| {
            let balance = running
                .entry(line.account_id)
                .or_insert_with(|| opening.get(&line.account_id).copied().unwrap_or_default());
            *balance += line.net();
            LedgerRow {
                running_balance: *balance,
                line,
            }
        })
        .collect()
}

/// Opening balance, movements and closing balance of one account.
///
/// `lines` may hold any of the account's lines; those after `range.end` and
/// those of other accounts are ignored.
#[must_use]
pub fn account_activity(account_id: Uuid, range: DateRange, lines: &[PostedLine]) -> AccountActivity {
    let opening_balance = range
        .day_before_start()
        .map_or(Decimal::ZERO, |d| signed_balance(lines, account_id, Some(d)));

    let in_range: Vec<PostedLine> = lines
        .iter()
        .filter(|l| l.account_id == account_id && range.contains(l.entry_date))
        .cloned()
        .collect();
    let total_debit: Decimal = in_range.iter().map(|l| l.debit).sum();
    let total_credit: Decimal = in_range.iter().map(|l| l.credit).sum();

    let opening = HashMap::from([(account_id, opening_balance)]);
    let rows = general_ledger(in_range, &opening);

    AccountActivity {
        account_id,
        range,
        opening_balance,
        rows,
        total_debit,
        total_credit,
        closing_balance: opening_balance + total_debit - total_credit,
    }
}
