//! Report queries.
//!
//! Loads the lines of effective entries together with their entry header
//! and hands them to the pure derivations in `tally_core::reports`.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use tally_core::ledger::JournalEntryStatus;
use tally_core::reports::{
    self as derive, AccountActivity, AccountBalance, AccountRef, BalanceSheet, IncomeStatement,
    LedgerRow, PostedLine, ReportError, TrialBalance,
};
use tally_shared::types::{CompanyScope, DateRange, PageRequest, PageResponse};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::JournalEntryStatus as StoredStatus;
use crate::entities::{accounts, journal_entries, journal_lines};
use crate::error::ReportStoreError;

/// Which journal lines a report reads.
#[derive(Debug, Clone, Default)]
pub struct LineFilter {
    /// Restrict to one account.
    pub account_id: Option<Uuid>,
    /// Entry statuses to include; empty means POSTED and REVERSED.
    pub statuses: Vec<JournalEntryStatus>,
    /// Entries dated on or after.
    pub from: Option<NaiveDate>,
    /// Entries dated on or before.
    pub to: Option<NaiveDate>,
}

impl LineFilter {
    /// Effective lines of one account dated on or before `as_of`.
    #[must_use]
    pub fn account_through(account_id: Uuid, as_of: Option<NaiveDate>) -> Self {
        Self {
            account_id: Some(account_id),
            to: as_of,
            ..Self::default()
        }
    }

    /// Effective lines of every account dated on or before `as_of`.
    #[must_use]
    pub fn through(as_of: Option<NaiveDate>) -> Self {
        Self {
            to: as_of,
            ..Self::default()
        }
    }
}

/// Loads journal lines with their entry's date and number.
pub(crate) async fn posted_lines<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    filter: &LineFilter,
) -> Result<Vec<PostedLine>, DbErr> {
    let statuses: Vec<StoredStatus> = if filter.statuses.is_empty() {
        JournalEntryStatus::EFFECTIVE.iter().map(|s| (*s).into()).collect()
    } else {
        filter.statuses.iter().map(|s| (*s).into()).collect()
    };

    let mut query = journal_lines::Entity::find()
        .find_also_related(journal_entries::Entity)
        .filter(journal_entries::Column::TenantId.eq(scope.tenant()))
        .filter(journal_entries::Column::CompanyId.eq(scope.company()))
        .filter(journal_entries::Column::Status.is_in(statuses));

    if let Some(account_id) = filter.account_id {
        query = query.filter(journal_lines::Column::AccountId.eq(account_id));
    }
    if let Some(from) = filter.from {
        query = query.filter(journal_entries::Column::EntryDate.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(journal_entries::Column::EntryDate.lte(to));
    }

    let rows = query
        .order_by_asc(journal_entries::Column::EntryDate)
        .order_by_asc(journal_entries::Column::EntryNumber)
        .order_by_asc(journal_lines::Column::LineNumber)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(line, entry)| {
            let entry = entry?;
            Some(PostedLine {
                entry_id: entry.id,
                entry_number: entry.entry_number,
                entry_date: entry.entry_date,
                line_number: line.line_number,
                account_id: line.account_id,
                description: line.description,
                debit: line.debit,
                credit: line.credit,
            })
        })
        .collect())
}

async fn account_refs<C: ConnectionTrait>(db: &C, scope: &CompanyScope) -> Result<Vec<AccountRef>, DbErr> {
    let accounts = accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(scope.tenant()))
        .filter(accounts::Column::CompanyId.eq(scope.company()))
        .order_by_asc(accounts::Column::Code)
        .all(db)
        .await?;

    Ok(accounts
        .into_iter()
        .map(|a| AccountRef {
            id: a.id,
            code: a.code,
            name: a.name,
            account_type: a.account_type.into(),
            balance_class: a.balance_class.map(Into::into),
            is_active: a.is_active,
        })
        .collect())
}

async fn ensure_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    account_id: Uuid,
) -> Result<(), ReportStoreError> {
    let found = accounts::Entity::find_by_id(account_id)
        .filter(accounts::Column::TenantId.eq(scope.tenant()))
        .filter(accounts::Column::CompanyId.eq(scope.company()))
        .one(db)
        .await?;

    if found.is_none() {
        return Err(ReportError::AccountNotFound(account_id).into());
    }
    Ok(())
}

fn date_range(start: NaiveDate, end: NaiveDate) -> Result<DateRange, ReportError> {
    DateRange::new(start, end).ok_or(ReportError::InvalidDateRange { start, end })
}

/// Signed balance (`debit - credit`) of an account, optionally as of a date.
///
/// # Errors
///
/// Returns `AccountNotFound` if the account is not in the company.
pub async fn account_balance<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    account_id: Uuid,
    as_of: Option<NaiveDate>,
) -> Result<Decimal, ReportStoreError> {
    ensure_account(db, scope, account_id).await?;
    let lines = posted_lines(db, scope, &LineFilter::account_through(account_id, as_of)).await?;
    Ok(derive::signed_balance(&lines, account_id, as_of))
}

/// Balances of every active account with activity, in code order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn account_balances<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    as_of: Option<NaiveDate>,
) -> Result<Vec<AccountBalance>, ReportStoreError> {
    let accounts = account_refs(db, scope).await?;
    let lines = posted_lines(db, scope, &LineFilter::through(as_of)).await?;
    Ok(derive::account_balances(&accounts, &lines))
}

/// General ledger listing with per-account running balances.
///
/// Running balances start from each account's balance on the day before
/// `filter.from`, so a page shows the same balances as the full listing.
///
/// # Errors
///
/// Returns `InvalidDateRange` if `from` is after `to`.
pub async fn general_ledger<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    filter: LineFilter,
    page: PageRequest,
) -> Result<PageResponse<LedgerRow>, ReportStoreError> {
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        date_range(from, to)?;
    }
    if let Some(account_id) = filter.account_id {
        ensure_account(db, scope, account_id).await?;
    }

    let mut opening: HashMap<Uuid, Decimal> = HashMap::new();
    if let Some(before) = filter.from.and_then(|d| d.pred_opt()) {
        let earlier = LineFilter {
            from: None,
            to: Some(before),
            ..filter.clone()
        };
        for line in posted_lines(db, scope, &earlier).await? {
            *opening.entry(line.account_id).or_default() += line.net();
        }
    }

    let rows = derive::general_ledger(posted_lines(db, scope, &filter).await?, &opening);
    let total = u64::try_from(rows.len()).unwrap_or(u64::MAX);
    let data = rows
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect();

    Ok(PageResponse::new(data, page, total))
}

/// Opening balance, movements and closing balance of one account.
///
/// # Errors
///
/// Returns an error if the range is invalid or the account is not in the company.
pub async fn account_activity<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    account_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<AccountActivity, ReportStoreError> {
    let range = date_range(start, end)?;
    ensure_account(db, scope, account_id).await?;

    let lines = posted_lines(db, scope, &LineFilter::account_through(account_id, Some(end))).await?;
    Ok(derive::account_activity(account_id, range, &lines))
}

/// Trial balance as of a date.
///
/// Covers every account with activity, including deactivated ones.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn trial_balance<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    as_of: NaiveDate,
) -> Result<TrialBalance, ReportStoreError> {
    let accounts = account_refs(db, scope).await?;
    let lines = posted_lines(db, scope, &LineFilter::through(Some(as_of))).await?;
    let balances = derive::ledger_balances(&accounts, &lines);
    let report = derive::trial_balance(as_of, &balances);

    if !report.is_balanced {
        tracing::warn!(
            %as_of,
            total_debit = %report.total_debit,
            total_credit = %report.total_credit,
            "trial balance does not balance"
        );
    }
    Ok(report)
}

/// Income statement over `start..=end`.
///
/// # Errors
///
/// Returns `InvalidDateRange` if `start` is after `end`.
pub async fn income_statement<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<IncomeStatement, ReportStoreError> {
    let range = date_range(start, end)?;
    let accounts = account_refs(db, scope).await?;
    let filter = LineFilter {
        from: Some(start),
        to: Some(end),
        ..LineFilter::default()
    };
    let lines = posted_lines(db, scope, &filter).await?;
    Ok(derive::income_statement(range, &accounts, &lines))
}

/// Balance sheet as of a date, with retained earnings derived from the
/// income statement through that date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn balance_sheet<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    as_of: NaiveDate,
) -> Result<BalanceSheet, ReportStoreError> {
    let accounts = account_refs(db, scope).await?;
    let lines = posted_lines(db, scope, &LineFilter::through(Some(as_of))).await?;
    let report = derive::balance_sheet(as_of, &accounts, &lines);

    if !report.is_balanced {
        tracing::warn!(
            %as_of,
            assets = %report.assets.total,
            liabilities_and_equity = %report.total_liabilities_and_equity,
            "balance sheet does not balance"
        );
    }
    Ok(report)
}
