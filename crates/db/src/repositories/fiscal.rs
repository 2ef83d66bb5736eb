//! Fiscal period repository.
//!
//! Periods are non-overlapping date windows per company. Every journal entry
//! is assigned the period containing its date, and only OPEN periods accept
//! new or posted entries.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use tally_core::fiscal::{
    FiscalError, FiscalPeriodStatus, PeriodType, PeriodWindow, close, ensure_allows_posting,
    ensure_no_overlap, lock, reopen, split_periods, validate_date_range,
};
use tally_shared::types::{CompanyScope, DateRange};
use uuid::Uuid;

use super::now;
use crate::entities::{fiscal_periods, journal_entries, sea_orm_active_enums::JournalEntryStatus};
use crate::error::FiscalStoreError;

/// Input for creating a fiscal period.
#[derive(Debug, Clone)]
pub struct NewPeriod {
    /// Period name.
    pub name: String,
    /// Period length.
    pub period_type: PeriodType,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

fn scoped(scope: &CompanyScope) -> Select<fiscal_periods::Entity> {
    fiscal_periods::Entity::find()
        .filter(fiscal_periods::Column::TenantId.eq(scope.tenant()))
        .filter(fiscal_periods::Column::CompanyId.eq(scope.company()))
}

/// The date window and status of a stored period.
#[must_use]
pub fn to_window(period: &fiscal_periods::Model) -> PeriodWindow {
    PeriodWindow {
        id: period.id,
        name: period.name.clone(),
        range: DateRange {
            start: period.start_date,
            end: period.end_date,
        },
        status: period.status.into(),
    }
}

async fn windows<C: ConnectionTrait>(db: &C, scope: &CompanyScope) -> Result<Vec<PeriodWindow>, DbErr> {
    Ok(scoped(scope).all(db).await?.iter().map(to_window).collect())
}

async fn insert_period<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    name: String,
    period_type: PeriodType,
    range: DateRange,
) -> Result<fiscal_periods::Model, DbErr> {
    let now = now();
    fiscal_periods::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(scope.tenant()),
        company_id: Set(scope.company()),
        name: Set(name),
        period_type: Set(period_type.into()),
        start_date: Set(range.start),
        end_date: Set(range.end),
        status: Set(FiscalPeriodStatus::Open.into()),
        closed_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

/// Creates an OPEN period.
///
/// # Errors
///
/// Returns an error if the name is empty, the start is after the end, or the
/// window intersects an existing period of the company.
pub async fn create_period<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    input: NewPeriod,
) -> Result<fiscal_periods::Model, FiscalStoreError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(FiscalError::EmptyName.into());
    }
    let range = validate_date_range(input.start_date, input.end_date)?;
    ensure_no_overlap(&range, &windows(db, scope).await?)?;

    let period = insert_period(db, scope, name.to_string(), input.period_type, range).await?;
    tracing::info!(
        period_id = %period.id,
        name = %period.name,
        start = %period.start_date,
        end = %period.end_date,
        "fiscal period created"
    );
    Ok(period)
}

/// Splits `start..=end` into periods of `period_type` and creates them all.
///
/// Either every period is created or none is.
///
/// # Errors
///
/// Returns an error if the range is invalid or any generated period
/// overlaps an existing one.
pub async fn generate_periods<C>(
    db: &C,
    scope: &CompanyScope,
    start: NaiveDate,
    end: NaiveDate,
    period_type: PeriodType,
) -> Result<Vec<fiscal_periods::Model>, FiscalStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let range = validate_date_range(start, end)?;
    let drafts = split_periods(range, period_type);

    let txn = db.begin().await?;
    let existing = windows(&txn, scope).await?;

    let mut created = Vec::with_capacity(drafts.len());
    for draft in drafts {
        ensure_no_overlap(&draft.range, &existing)?;
        created.push(insert_period(&txn, scope, draft.name, draft.period_type, draft.range).await?);
    }
    txn.commit().await?;

    tracing::info!(
        count = created.len(),
        period_type = %period_type,
        %start,
        %end,
        "fiscal periods generated"
    );
    Ok(created)
}

/// Lists the company's periods ordered by start date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_periods<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
) -> Result<Vec<fiscal_periods::Model>, DbErr> {
    scoped(scope)
        .order_by_asc(fiscal_periods::Column::StartDate)
        .all(db)
        .await
}

/// Finds a period in `scope`.
///
/// # Errors
///
/// Returns `PeriodNotFound` if the period does not exist in the company.
pub async fn get_period<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<fiscal_periods::Model, FiscalStoreError> {
    scoped(scope)
        .filter(fiscal_periods::Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| FiscalError::PeriodNotFound(id).into())
}

/// Resolves the period whose window contains `date`, whatever its status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn find_period_for_date<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    date: NaiveDate,
) -> Result<Option<fiscal_periods::Model>, DbErr> {
    scoped(scope)
        .filter(fiscal_periods::Column::StartDate.lte(date))
        .filter(fiscal_periods::Column::EndDate.gte(date))
        .one(db)
        .await
}

/// Resolves the period for `date` and checks that it accepts entries.
///
/// # Errors
///
/// Returns `NoPeriodForDate` if no period contains the date, or
/// `PeriodNotOpen` if the period is CLOSED or LOCKED.
pub async fn require_open_period<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    date: NaiveDate,
) -> Result<fiscal_periods::Model, FiscalStoreError> {
    let period = find_period_for_date(db, scope, date)
        .await?
        .ok_or(FiscalError::NoPeriodForDate(date))?;
    ensure_allows_posting(&to_window(&period))?;
    Ok(period)
}

async fn set_status<C: ConnectionTrait>(
    db: &C,
    period: fiscal_periods::Model,
    status: FiscalPeriodStatus,
) -> Result<fiscal_periods::Model, DbErr> {
    let now = now();
    let mut active: fiscal_periods::ActiveModel = period.into();
    active.status = Set(status.into());
    match status {
        FiscalPeriodStatus::Open => active.closed_at = Set(None),
        FiscalPeriodStatus::Closed => active.closed_at = Set(Some(now)),
        FiscalPeriodStatus::Locked => {}
    }
    active.updated_at = Set(now);
    active.update(db).await
}

/// Closes an OPEN period that has no draft entries.
///
/// # Errors
///
/// Returns an error if the period is not found, is not OPEN, or still has
/// draft entries.
pub async fn close_period<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<fiscal_periods::Model, FiscalStoreError> {
    let period = get_period(db, scope, id).await?;

    let drafts = journal_entries::Entity::find()
        .filter(journal_entries::Column::PeriodId.eq(id))
        .filter(journal_entries::Column::Status.eq(JournalEntryStatus::Draft))
        .count(db)
        .await?;
    let status = close(period.status.into(), drafts).inspect_err(|_| {
        if drafts > 0 {
            tracing::warn!(period_id = %id, drafts, "period close rejected: draft entries remain");
        }
    })?;

    let period = set_status(db, period, status).await?;
    tracing::info!(period_id = %id, name = %period.name, "fiscal period closed");
    Ok(period)
}

/// Reopens a CLOSED period.
///
/// # Errors
///
/// Returns an error if the period is not found, is LOCKED, or is already OPEN.
pub async fn reopen_period<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<fiscal_periods::Model, FiscalStoreError> {
    let period = get_period(db, scope, id).await?;
    let status = reopen(period.status.into())?;

    let period = set_status(db, period, status).await?;
    tracing::info!(period_id = %id, name = %period.name, "fiscal period reopened");
    Ok(period)
}

/// Locks a CLOSED period for good.
///
/// # Errors
///
/// Returns an error if the period is not found or is not CLOSED.
pub async fn lock_period<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<fiscal_periods::Model, FiscalStoreError> {
    let period = get_period(db, scope, id).await?;
    let status = lock(period.status.into())?;

    let period = set_status(db, period, status).await?;
    tracing::info!(period_id = %id, name = %period.name, "fiscal period locked");
    Ok(period)
}
