//! Journal entry repository.
//!
//! Entries are created as DRAFT against the OPEN period containing their
//! date, may be edited or deleted while DRAFT, become immutable once POSTED,
//! and are undone only by reversal: a posted mirror entry plus a REVERSED
//! mark on the original, written in one transaction.

use chrono::{Datelike, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tally_core::ledger::{
    DocumentPrefix, JournalEntryStatus, JournalEntryType, JournalLineInput, LedgerError,
    LineTotals, PreparedLine, build_reversal, check_accounts, ensure_deletable, ensure_editable,
    ensure_postable, ensure_reversible, prepare_lines,
};
use tally_shared::config::LedgerConfig;
use tally_shared::types::{CompanyScope, PageRequest, PageResponse, UserId};
use uuid::Uuid;

use super::{accounts, fiscal, now, sequences};
use crate::entities::sea_orm_active_enums::{
    JournalEntryStatus as StoredStatus, JournalEntryType as StoredType,
};
use crate::entities::{journal_entries, journal_lines};
use crate::error::LedgerStoreError;

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Accounting date; selects the fiscal period.
    pub entry_date: NaiveDate,
    /// Entry type.
    pub entry_type: JournalEntryType,
    /// What the entry records.
    pub description: String,
    /// External reference, e.g. a document number.
    pub reference: Option<String>,
    /// Originating document, e.g. `invoice:<id>`.
    pub source: Option<String>,
    /// At least two balanced lines.
    pub lines: Vec<JournalLineInput>,
    /// User creating the entry.
    pub created_by: Option<UserId>,
}

impl NewJournalEntry {
    /// A general entry with no reference.
    #[must_use]
    pub fn new(entry_date: NaiveDate, description: impl Into<String>, lines: Vec<JournalLineInput>) -> Self {
        Self {
            entry_date,
            entry_type: JournalEntryType::General,
            description: description.into(),
            reference: None,
            source: None,
            lines,
            created_by: None,
        }
    }
}

/// Changes applied to a draft by [`update_entry`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct JournalEntryUpdate {
    /// New date; the entry moves to the period containing it.
    pub entry_date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// New reference (`Some(None)` clears it).
    pub reference: Option<Option<String>>,
    /// Replacement lines; the old lines are removed.
    pub lines: Option<Vec<JournalLineInput>>,
}

/// A journal entry with its lines in line-number order.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// The entry.
    pub entry: journal_entries::Model,
    /// Its lines.
    pub lines: Vec<journal_lines::Model>,
}

/// Filter options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by status.
    pub status: Option<JournalEntryStatus>,
    /// Filter by entry type.
    pub entry_type: Option<JournalEntryType>,
    /// Entries dated on or after.
    pub from: Option<NaiveDate>,
    /// Entries dated on or before.
    pub to: Option<NaiveDate>,
}

fn scoped(scope: &CompanyScope) -> Select<journal_entries::Entity> {
    journal_entries::Entity::find()
        .filter(journal_entries::Column::TenantId.eq(scope.tenant()))
        .filter(journal_entries::Column::CompanyId.eq(scope.company()))
}

fn to_prepared(line: &journal_lines::Model) -> PreparedLine {
    PreparedLine {
        line_number: line.line_number,
        account_id: line.account_id,
        debit: line.debit,
        credit: line.credit,
        description: line.description.clone(),
    }
}

fn require_description(description: &str) -> Result<String, LedgerError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Validates lines, checks their accounts against `scope`.
async fn validated_lines(
    txn: &DatabaseTransaction,
    scope: &CompanyScope,
    lines: Vec<JournalLineInput>,
) -> Result<(Vec<PreparedLine>, LineTotals), LedgerStoreError> {
    let (prepared, totals) = prepare_lines(lines)?;
    let infos = accounts::account_infos(txn, prepared.iter().map(|l| l.account_id)).await?;
    check_accounts(scope, &prepared, &infos)?;
    Ok((prepared, totals))
}

async fn insert_lines(
    txn: &DatabaseTransaction,
    entry_id: Uuid,
    lines: Vec<PreparedLine>,
) -> Result<Vec<journal_lines::Model>, LedgerStoreError> {
    let mut stored = Vec::with_capacity(lines.len());
    for line in lines {
        let model = journal_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_id: Set(entry_id),
            line_number: Set(line.line_number),
            account_id: Set(line.account_id),
            description: Set(line.description),
            debit: Set(line.debit),
            credit: Set(line.credit),
        }
        .insert(txn)
        .await?;
        stored.push(model);
    }
    Ok(stored)
}

async fn load_lines<C: ConnectionTrait>(
    db: &C,
    entry_id: Uuid,
) -> Result<Vec<journal_lines::Model>, LedgerStoreError> {
    Ok(journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(entry_id))
        .order_by_asc(journal_lines::Column::LineNumber)
        .all(db)
        .await?)
}

/// Validates and inserts an entry, DRAFT unless `posted_by` is given.
async fn insert_entry(
    txn: &DatabaseTransaction,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewJournalEntry,
    posted_by: Option<UserId>,
    reversal_of: Option<Uuid>,
) -> Result<EntryWithLines, LedgerStoreError> {
    let description = require_description(&input.description)?;
    let (lines, totals) = validated_lines(txn, scope, input.lines).await?;
    let period = fiscal::require_open_period(txn, scope, input.entry_date).await?;

    let number = sequences::next_number(
        txn,
        scope,
        DocumentPrefix::JournalEntry,
        input.entry_date.year(),
        config.counter_max_retries,
    )
    .await?;

    let now = now();
    let status = if posted_by.is_some() {
        JournalEntryStatus::Posted
    } else {
        JournalEntryStatus::Draft
    };

    let entry = journal_entries::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(scope.tenant()),
        company_id: Set(scope.company()),
        period_id: Set(period.id),
        entry_number: Set(number),
        entry_date: Set(input.entry_date),
        entry_type: Set(input.entry_type.into()),
        status: Set(status.into()),
        description: Set(description),
        reference: Set(input.reference),
        source: Set(input.source),
        total_debit: Set(totals.debit),
        total_credit: Set(totals.credit),
        created_by: Set(input.created_by.map(UserId::into_inner)),
        posted_by: Set(posted_by.map(UserId::into_inner)),
        posted_at: Set(posted_by.map(|_| now)),
        reversed_at: Set(None),
        reversing_entry_id: Set(None),
        reversal_of_id: Set(reversal_of),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;

    let lines = insert_lines(txn, entry.id, lines).await?;
    Ok(EntryWithLines { entry, lines })
}

/// Creates a DRAFT entry.
///
/// # Errors
///
/// Returns an error if:
/// - The description is empty or the lines are invalid or unbalanced
/// - A line references an account outside the company or an inactive one
/// - No period contains the date, or that period is not OPEN
pub async fn create_entry<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewJournalEntry,
) -> Result<EntryWithLines, LedgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let created = insert_entry(&txn, scope, config, input, None, None).await?;
    txn.commit().await?;

    tracing::info!(
        entry_id = %created.entry.id,
        entry_number = %created.entry.entry_number,
        total = %created.entry.total_debit,
        "journal entry created"
    );
    Ok(created)
}

/// Creates an entry and posts it in one step.
///
/// # Errors
///
/// Same as [`create_entry`].
pub async fn create_and_post<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewJournalEntry,
    posted_by: UserId,
) -> Result<EntryWithLines, LedgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let created = insert_entry(&txn, scope, config, input, Some(posted_by), None).await?;
    txn.commit().await?;

    tracing::info!(
        entry_id = %created.entry.id,
        entry_number = %created.entry.entry_number,
        total = %created.entry.total_debit,
        "journal entry created and posted"
    );
    Ok(created)
}

/// Finds an entry header in `scope`.
///
/// # Errors
///
/// Returns `EntryNotFound` if the entry does not exist in the company.
pub async fn find_entry<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<journal_entries::Model, LedgerStoreError> {
    scoped(scope)
        .filter(journal_entries::Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::EntryNotFound(id).into())
}

/// Finds an entry and its lines.
///
/// # Errors
///
/// Returns `EntryNotFound` if the entry does not exist in the company.
pub async fn get_entry<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<EntryWithLines, LedgerStoreError> {
    let entry = find_entry(db, scope, id).await?;
    let lines = load_lines(db, id).await?;
    Ok(EntryWithLines { entry, lines })
}

/// Lists entries, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_entries<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    filter: EntryFilter,
    page: PageRequest,
) -> Result<PageResponse<journal_entries::Model>, LedgerStoreError> {
    let mut query = scoped(scope);
    if let Some(status) = filter.status {
        query = query.filter(journal_entries::Column::Status.eq(StoredStatus::from(status)));
    }
    if let Some(entry_type) = filter.entry_type {
        query = query.filter(journal_entries::Column::EntryType.eq(StoredType::from(entry_type)));
    }
    if let Some(from) = filter.from {
        query = query.filter(journal_entries::Column::EntryDate.gte(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(journal_entries::Column::EntryDate.lte(to));
    }

    let total = query.clone().count(db).await?;
    let entries = query
        .order_by_desc(journal_entries::Column::EntryDate)
        .order_by_desc(journal_entries::Column::EntryNumber)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await?;

    Ok(PageResponse::new(entries, page, total))
}

/// Edits a DRAFT entry. Replacement lines are validated from scratch.
///
/// # Errors
///
/// Returns an error if the entry is not found or not DRAFT, the new lines are
/// invalid, or the entry's date falls outside an OPEN period.
pub async fn update_entry<C>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
    input: JournalEntryUpdate,
) -> Result<EntryWithLines, LedgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let entry = find_entry(&txn, scope, id).await?;
    ensure_editable(entry.status.into())?;

    let entry_date = input.entry_date.unwrap_or(entry.entry_date);
    let period = fiscal::require_open_period(&txn, scope, entry_date).await?;

    let mut active: journal_entries::ActiveModel = entry.into();
    active.entry_date = Set(entry_date);
    active.period_id = Set(period.id);
    if let Some(description) = input.description {
        active.description = Set(require_description(&description)?);
    }
    if let Some(reference) = input.reference {
        active.reference = Set(reference);
    }

    let lines = if let Some(lines) = input.lines {
        let (prepared, totals) = validated_lines(&txn, scope, lines).await?;
        journal_lines::Entity::delete_many()
            .filter(journal_lines::Column::EntryId.eq(id))
            .exec(&txn)
            .await?;
        active.total_debit = Set(totals.debit);
        active.total_credit = Set(totals.credit);
        Some(insert_lines(&txn, id, prepared).await?)
    } else {
        None
    };

    active.updated_at = Set(now());
    let entry = active.update(&txn).await?;
    let lines = match lines {
        Some(lines) => lines,
        None => load_lines(&txn, id).await?,
    };
    txn.commit().await?;

    tracing::info!(entry_id = %id, entry_number = %entry.entry_number, "journal entry updated");
    Ok(EntryWithLines { entry, lines })
}

/// Posts a DRAFT entry.
///
/// The period is checked again: it may have been closed since the entry
/// was created.
///
/// # Errors
///
/// Returns an error if the entry is not found or not DRAFT, or its period
/// is no longer OPEN.
pub async fn post_entry<C>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
    posted_by: UserId,
) -> Result<journal_entries::Model, LedgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let entry = find_entry(&txn, scope, id).await?;
    ensure_postable(entry.status.into())?;
    fiscal::require_open_period(&txn, scope, entry.entry_date).await?;

    let now = now();
    let mut active: journal_entries::ActiveModel = entry.into();
    active.status = Set(JournalEntryStatus::Posted.into());
    active.posted_by = Set(Some(posted_by.into_inner()));
    active.posted_at = Set(Some(now));
    active.updated_at = Set(now);
    let entry = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        entry_id = %id,
        entry_number = %entry.entry_number,
        posted_by = %posted_by,
        "journal entry posted"
    );
    Ok(entry)
}

/// Reverses a POSTED entry.
///
/// Creates and posts a mirror entry dated `reversal_date` with every debit
/// and credit swapped, then marks the original REVERSED and links the two.
/// Both writes commit together. Returns the mirror entry.
///
/// # Errors
///
/// Returns an error if the entry is not found, is not POSTED, was already
/// reversed, or no OPEN period contains `reversal_date`.
pub async fn reverse_entry<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    id: Uuid,
    reversal_date: NaiveDate,
    reason: Option<&str>,
    reversed_by: UserId,
) -> Result<EntryWithLines, LedgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let original = find_entry(&txn, scope, id).await?;
    ensure_reversible(id, original.status.into(), original.reversed_at.is_some())?;

    let lines: Vec<PreparedLine> = load_lines(&txn, id).await?.iter().map(to_prepared).collect();
    let draft = build_reversal(&original.entry_number, &lines, reason);

    let input = NewJournalEntry {
        entry_date: reversal_date,
        entry_type: draft.entry_type,
        description: draft.description,
        reference: Some(draft.reference),
        source: original.source.clone(),
        lines: draft.lines,
        created_by: Some(reversed_by),
    };
    let mirror = insert_entry(&txn, scope, config, input, Some(reversed_by), Some(id)).await?;

    let now = now();
    let original_number = original.entry_number.clone();
    let mut active: journal_entries::ActiveModel = original.into();
    active.status = Set(JournalEntryStatus::Reversed.into());
    active.reversed_at = Set(Some(now));
    active.reversing_entry_id = Set(Some(mirror.entry.id));
    active.updated_at = Set(now);
    active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        entry_id = %id,
        entry_number = %original_number,
        reversal_id = %mirror.entry.id,
        reversal_number = %mirror.entry.entry_number,
        "journal entry reversed"
    );
    Ok(mirror)
}

/// Deletes a DRAFT entry and its lines.
///
/// # Errors
///
/// Returns an error if the entry is not found or not DRAFT.
pub async fn delete_entry<C>(db: &C, scope: &CompanyScope, id: Uuid) -> Result<(), LedgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let entry = find_entry(&txn, scope, id).await?;
    ensure_deletable(entry.status.into())?;

    journal_lines::Entity::delete_many()
        .filter(journal_lines::Column::EntryId.eq(id))
        .exec(&txn)
        .await?;
    journal_entries::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(entry_id = %id, entry_number = %entry.entry_number, "journal entry deleted");
    Ok(())
}
