//! Bank accounts, statement imports and reconciliations.
//!
//! A bank account mirrors one asset account of the chart. Statement lines
//! are imported in named batches, then matched against journal entries
//! inside a reconciliation that snapshots the statement balance against the
//! GL balance at the statement date.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr, TransactionTrait,
};
use tally_core::accounts::AccountType;
use tally_core::ledger::JournalEntryStatus;
use tally_core::reconciliation::{
    self as rules, BankLine, MatchCandidate, MatchSettings, MatchSuggestion, ReconciliationError,
    ReconciliationStatus, StatementLineInput,
};
use tally_core::reports::PostedLine;
use tally_shared::config::LedgerConfig;
use tally_shared::types::CompanyScope;
use uuid::Uuid;

use super::reports::{self, LineFilter};
use super::{now, resolve_currency};
use crate::entities::sea_orm_active_enums::{
    AccountType as StoredAccountType, JournalEntryStatus as StoredEntryStatus,
    ReconciliationStatus as StoredStatus,
};
use crate::entities::{
    accounts, bank_accounts, bank_reconciliations, bank_transactions, journal_entries, statement_imports,
};
use crate::error::ReconciliationStoreError;

/// Input for registering a bank account.
#[derive(Debug, Clone)]
pub struct NewBankAccount {
    /// Display name.
    pub name: String,
    /// Account number at the bank.
    pub account_number: Option<String>,
    /// ISO currency code; defaults to the configured currency.
    pub currency: Option<String>,
    /// Asset account the bank account posts to.
    pub gl_account_id: Uuid,
}

fn scoped_accounts(scope: &CompanyScope) -> Select<bank_accounts::Entity> {
    bank_accounts::Entity::find()
        .filter(bank_accounts::Column::TenantId.eq(scope.tenant()))
        .filter(bank_accounts::Column::CompanyId.eq(scope.company()))
}

fn scoped_reconciliations(scope: &CompanyScope) -> Select<bank_reconciliations::Entity> {
    bank_reconciliations::Entity::find()
        .filter(bank_reconciliations::Column::TenantId.eq(scope.tenant()))
        .filter(bank_reconciliations::Column::CompanyId.eq(scope.company()))
}

fn to_line(transaction: &bank_transactions::Model) -> BankLine {
    BankLine {
        id: transaction.id,
        transaction_date: transaction.transaction_date,
        debit: transaction.debit,
        credit: transaction.credit,
        is_reconciled: transaction.is_reconciled,
    }
}

// ========== Bank accounts ==========

/// Registers a bank account against an asset account of the chart.
///
/// # Errors
///
/// Returns an error if the name is empty, the currency is not an ISO code,
/// or the GL account is not an active asset account of the company.
pub async fn create_bank_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewBankAccount,
) -> Result<bank_accounts::Model, ReconciliationStoreError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ReconciliationError::EmptyName.into());
    }
    let currency = resolve_currency(input.currency.as_deref(), config)
        .map_err(ReconciliationError::InvalidCurrency)?;

    let gl_account = accounts::Entity::find_by_id(input.gl_account_id)
        .filter(accounts::Column::TenantId.eq(scope.tenant()))
        .filter(accounts::Column::CompanyId.eq(scope.company()))
        .one(db)
        .await?;
    let usable = gl_account.is_some_and(|a| {
        a.is_active && a.account_type == StoredAccountType::from(AccountType::Asset)
    });
    if !usable {
        return Err(ReconciliationError::InvalidGlAccount(input.gl_account_id).into());
    }

    let now = now();
    let account = bank_accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(scope.tenant()),
        company_id: Set(scope.company()),
        name: Set(name.to_string()),
        account_number: Set(input.account_number),
        currency: Set(currency),
        gl_account_id: Set(input.gl_account_id),
        current_balance: Set(Decimal::ZERO),
        last_reconciled_balance: Set(None),
        last_reconciled_at: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    tracing::info!(bank_account_id = %account.id, name = %account.name, "bank account created");
    Ok(account)
}

/// Finds a bank account in `scope`.
///
/// # Errors
///
/// Returns `BankAccountNotFound` if it does not exist in the company.
pub async fn get_bank_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<bank_accounts::Model, ReconciliationStoreError> {
    scoped_accounts(scope)
        .filter(bank_accounts::Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| ReconciliationError::BankAccountNotFound(id).into())
}

/// Lists the company's bank accounts by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_bank_accounts<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
) -> Result<Vec<bank_accounts::Model>, ReconciliationStoreError> {
    Ok(scoped_accounts(scope)
        .order_by_asc(bank_accounts::Column::Name)
        .all(db)
        .await?)
}

// ========== Statement import ==========

/// Imports a statement batch as unreconciled transactions and moves the
/// bank account's current balance by the batch net.
///
/// # Errors
///
/// Returns an error if a line is invalid or `batch_id` was already imported
/// for this bank account. Nothing is written on error.
pub async fn import_statement<C>(
    db: &C,
    scope: &CompanyScope,
    bank_account_id: Uuid,
    batch_id: &str,
    lines: Vec<StatementLineInput>,
) -> Result<Vec<bank_transactions::Model>, ReconciliationStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    rules::validate_statement(batch_id, &lines)?;
    let batch_id = batch_id.trim();
    let net = rules::batch_net(&lines);

    let txn = db.begin().await?;
    let account = get_bank_account(&txn, scope, bank_account_id).await?;

    let now = now();
    let claimed = statement_imports::ActiveModel {
        id: Set(Uuid::new_v4()),
        bank_account_id: Set(bank_account_id),
        import_batch: Set(batch_id.to_string()),
        line_count: Set(i32::try_from(lines.len()).unwrap_or(i32::MAX)),
        net: Set(net),
        imported_at: Set(now),
    }
    .insert(&txn)
    .await;
    match claimed {
        Ok(_) => {}
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            txn.rollback().await?;
            tracing::warn!(%bank_account_id, batch = batch_id, "statement batch already imported");
            return Err(ReconciliationError::DuplicateBatch(batch_id.to_string()).into());
        }
        Err(err) => return Err(err.into()),
    }

    let mut created = Vec::with_capacity(lines.len());
    for line in lines {
        let row = bank_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            bank_account_id: Set(bank_account_id),
            transaction_date: Set(line.transaction_date),
            description: Set(line.description.trim().to_string()),
            reference: Set(line.reference),
            debit: Set(line.debit),
            credit: Set(line.credit),
            import_batch: Set(batch_id.to_string()),
            is_reconciled: Set(false),
            journal_entry_id: Set(None),
            reconciliation_id: Set(None),
            reconciled_at: Set(None),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;
        created.push(row);
    }

    let balance = account.current_balance + net;
    let mut active: bank_accounts::ActiveModel = account.into();
    active.current_balance = Set(balance);
    active.updated_at = Set(now);
    active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        %bank_account_id,
        batch = batch_id,
        lines = created.len(),
        %net,
        "bank statement imported"
    );
    Ok(created)
}

/// Finds a bank transaction whose bank account is in `scope`.
///
/// # Errors
///
/// Returns `TransactionNotFound` if it does not exist in the company.
pub async fn get_transaction<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<bank_transactions::Model, ReconciliationStoreError> {
    let found = bank_transactions::Entity::find_by_id(id)
        .find_also_related(bank_accounts::Entity)
        .one(db)
        .await?;

    match found {
        Some((transaction, Some(account))) if scope.owns(account.tenant_id, account.company_id) => {
            Ok(transaction)
        }
        _ => Err(ReconciliationError::TransactionNotFound(id).into()),
    }
}

/// Lists a bank account's transactions by date.
///
/// # Errors
///
/// Returns `BankAccountNotFound` if the bank account is not in the company.
pub async fn list_transactions<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    bank_account_id: Uuid,
    unreconciled_only: bool,
) -> Result<Vec<bank_transactions::Model>, ReconciliationStoreError> {
    get_bank_account(db, scope, bank_account_id).await?;

    let mut query = bank_transactions::Entity::find()
        .filter(bank_transactions::Column::BankAccountId.eq(bank_account_id));
    if unreconciled_only {
        query = query.filter(bank_transactions::Column::IsReconciled.eq(false));
    }

    Ok(query
        .order_by_asc(bank_transactions::Column::TransactionDate)
        .order_by_asc(bank_transactions::Column::CreatedAt)
        .all(db)
        .await?)
}

// ========== Reconciliations ==========

/// Opens a reconciliation for a statement, recording the GL balance at the
/// statement date, the adjusted GL balance and the difference.
///
/// # Errors
///
/// Returns `AlreadyInProgress` if the bank account has an open
/// reconciliation.
pub async fn start_reconciliation<C>(
    db: &C,
    scope: &CompanyScope,
    bank_account_id: Uuid,
    statement_date: NaiveDate,
    statement_balance: Decimal,
) -> Result<bank_reconciliations::Model, ReconciliationStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let account = get_bank_account(&txn, scope, bank_account_id).await?;

    let open = scoped_reconciliations(scope)
        .filter(bank_reconciliations::Column::BankAccountId.eq(bank_account_id))
        .filter(bank_reconciliations::Column::Status.eq(StoredStatus::InProgress))
        .one(&txn)
        .await?;
    if let Some(open) = open {
        return Err(ReconciliationError::AlreadyInProgress(open.id).into());
    }

    let gl_lines = reports::posted_lines(
        &txn,
        scope,
        &LineFilter::account_through(account.gl_account_id, Some(statement_date)),
    )
    .await?;
    let gl_balance: Decimal = gl_lines.iter().map(PostedLine::net).sum();

    let transactions = bank_transactions::Entity::find()
        .filter(bank_transactions::Column::BankAccountId.eq(bank_account_id))
        .all(&txn)
        .await?;
    let lines: Vec<BankLine> = transactions.iter().map(to_line).collect();
    let snapshot = rules::compute_snapshot(statement_date, statement_balance, gl_balance, &lines);

    let reconciliation = bank_reconciliations::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(scope.tenant()),
        company_id: Set(scope.company()),
        bank_account_id: Set(bank_account_id),
        statement_date: Set(statement_date),
        statement_balance: Set(snapshot.statement_balance),
        gl_balance: Set(snapshot.gl_balance),
        adjusted_gl_balance: Set(snapshot.adjusted_gl_balance),
        difference: Set(snapshot.difference),
        status: Set(ReconciliationStatus::InProgress.into()),
        completed_at: Set(None),
        created_at: Set(now()),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        reconciliation_id = %reconciliation.id,
        %bank_account_id,
        %statement_date,
        statement_balance = %snapshot.statement_balance,
        gl_balance = %snapshot.gl_balance,
        adjusted_gl_balance = %snapshot.adjusted_gl_balance,
        difference = %snapshot.difference,
        "reconciliation started"
    );
    Ok(reconciliation)
}

/// Finds a reconciliation in `scope`.
///
/// # Errors
///
/// Returns `ReconciliationNotFound` if it does not exist in the company.
pub async fn get_reconciliation<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<bank_reconciliations::Model, ReconciliationStoreError> {
    scoped_reconciliations(scope)
        .filter(bank_reconciliations::Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| ReconciliationError::ReconciliationNotFound(id).into())
}

/// Lists a bank account's reconciliations, latest statement first.
///
/// # Errors
///
/// Returns `BankAccountNotFound` if the bank account is not in the company.
pub async fn list_reconciliations<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    bank_account_id: Uuid,
) -> Result<Vec<bank_reconciliations::Model>, ReconciliationStoreError> {
    get_bank_account(db, scope, bank_account_id).await?;
    Ok(scoped_reconciliations(scope)
        .filter(bank_reconciliations::Column::BankAccountId.eq(bank_account_id))
        .order_by_desc(bank_reconciliations::Column::StatementDate)
        .all(db)
        .await?)
}

/// Marks a transaction reconciled inside an open reconciliation, optionally
/// linking the journal entry it corresponds to.
///
/// # Errors
///
/// Returns an error if the reconciliation is completed, the transaction
/// belongs to another bank account or is already reconciled, or the entry
/// is not an effective entry of the company.
pub async fn match_transaction<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    reconciliation_id: Uuid,
    transaction_id: Uuid,
    journal_entry_id: Option<Uuid>,
) -> Result<bank_transactions::Model, ReconciliationStoreError> {
    let reconciliation = get_reconciliation(db, scope, reconciliation_id).await?;
    let transaction = get_transaction(db, scope, transaction_id).await?;
    if transaction.bank_account_id != reconciliation.bank_account_id {
        return Err(ReconciliationError::WrongBankAccount(transaction_id).into());
    }
    rules::ensure_can_match(reconciliation_id, reconciliation.status.into(), &to_line(&transaction))?;

    if let Some(entry_id) = journal_entry_id {
        let effective: Vec<StoredEntryStatus> =
            JournalEntryStatus::EFFECTIVE.iter().map(|s| (*s).into()).collect();
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::TenantId.eq(scope.tenant()))
            .filter(journal_entries::Column::CompanyId.eq(scope.company()))
            .filter(journal_entries::Column::Status.is_in(effective))
            .one(db)
            .await?;
        if entry.is_none() {
            return Err(ReconciliationError::EntryNotLinkable(entry_id).into());
        }
    }

    let mut active: bank_transactions::ActiveModel = transaction.into();
    active.is_reconciled = Set(true);
    active.journal_entry_id = Set(journal_entry_id);
    active.reconciliation_id = Set(Some(reconciliation_id));
    active.reconciled_at = Set(Some(now()));
    let transaction = active.update(db).await?;

    tracing::info!(
        %reconciliation_id,
        %transaction_id,
        journal_entry_id = ?journal_entry_id,
        "bank transaction matched"
    );
    Ok(transaction)
}

/// Clears a transaction's match.
///
/// # Errors
///
/// Returns an error if the transaction is not reconciled or its
/// reconciliation is completed.
pub async fn unmatch_transaction<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    transaction_id: Uuid,
) -> Result<bank_transactions::Model, ReconciliationStoreError> {
    let transaction = get_transaction(db, scope, transaction_id).await?;
    let line = to_line(&transaction);

    match transaction.reconciliation_id {
        Some(reconciliation_id) => {
            let reconciliation = get_reconciliation(db, scope, reconciliation_id).await?;
            rules::ensure_can_unmatch(reconciliation_id, reconciliation.status.into(), &line)?;
        }
        None if !line.is_reconciled => {
            return Err(ReconciliationError::NotReconciled(transaction_id).into());
        }
        None => {}
    }

    let mut active: bank_transactions::ActiveModel = transaction.into();
    active.is_reconciled = Set(false);
    active.journal_entry_id = Set(None);
    active.reconciliation_id = Set(None);
    active.reconciled_at = Set(None);
    let transaction = active.update(db).await?;

    tracing::info!(%transaction_id, "bank transaction unmatched");
    Ok(transaction)
}

/// Completes a reconciliation and stamps the bank account's last reconciled
/// balance.
///
/// # Errors
///
/// Returns an error if it is already completed, transactions dated on or
/// before the statement date are still unreconciled, or the difference is
/// not resolved.
pub async fn complete_reconciliation<C>(
    db: &C,
    scope: &CompanyScope,
    reconciliation_id: Uuid,
) -> Result<bank_reconciliations::Model, ReconciliationStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let reconciliation = get_reconciliation(&txn, scope, reconciliation_id).await?;

    let unreconciled = bank_transactions::Entity::find()
        .filter(bank_transactions::Column::BankAccountId.eq(reconciliation.bank_account_id))
        .filter(bank_transactions::Column::IsReconciled.eq(false))
        .filter(bank_transactions::Column::TransactionDate.lte(reconciliation.statement_date))
        .count(&txn)
        .await?;
    rules::ensure_completable(
        reconciliation_id,
        reconciliation.status.into(),
        unreconciled,
        reconciliation.difference,
    )
    .inspect_err(|err| {
        tracing::warn!(%reconciliation_id, unreconciled, error = %err, "reconciliation completion rejected");
    })?;

    let now = now();
    let account = get_bank_account(&txn, scope, reconciliation.bank_account_id).await?;
    let statement_balance = reconciliation.statement_balance;

    let mut active: bank_reconciliations::ActiveModel = reconciliation.into();
    active.status = Set(ReconciliationStatus::Completed.into());
    active.completed_at = Set(Some(now));
    let reconciliation = active.update(&txn).await?;

    let mut account: bank_accounts::ActiveModel = account.into();
    account.last_reconciled_balance = Set(Some(statement_balance));
    account.last_reconciled_at = Set(Some(now));
    account.updated_at = Set(now);
    account.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        %reconciliation_id,
        bank_account_id = %reconciliation.bank_account_id,
        %statement_balance,
        "reconciliation completed"
    );
    Ok(reconciliation)
}

/// Discards an open reconciliation and releases the transactions matched in
/// it.
///
/// # Errors
///
/// Returns `ReconciliationCompleted` if it is already completed.
pub async fn cancel_reconciliation<C>(
    db: &C,
    scope: &CompanyScope,
    reconciliation_id: Uuid,
) -> Result<(), ReconciliationStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let reconciliation = get_reconciliation(&txn, scope, reconciliation_id).await?;
    if ReconciliationStatus::from(reconciliation.status) == ReconciliationStatus::Completed {
        return Err(ReconciliationError::ReconciliationCompleted(reconciliation_id).into());
    }

    let released = bank_transactions::Entity::update_many()
        .col_expr(bank_transactions::Column::IsReconciled, Expr::value(false))
        .col_expr(bank_transactions::Column::JournalEntryId, Expr::value(Option::<Uuid>::None))
        .col_expr(bank_transactions::Column::ReconciliationId, Expr::value(Option::<Uuid>::None))
        .col_expr(
            bank_transactions::Column::ReconciledAt,
            Expr::value(Option::<DateTimeWithTimeZone>::None),
        )
        .filter(bank_transactions::Column::ReconciliationId.eq(reconciliation_id))
        .exec(&txn)
        .await?;
    reconciliation.delete(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        %reconciliation_id,
        released = released.rows_affected,
        "reconciliation cancelled"
    );
    Ok(())
}

// ========== Match suggestions ==========

/// Entries already linked to a reconciled transaction of the company.
async fn linked_entries<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
) -> Result<HashSet<Uuid>, DbErr> {
    let account_ids: Vec<Uuid> = scoped_accounts(scope)
        .select_only()
        .column(bank_accounts::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    let linked: Vec<Option<Uuid>> = bank_transactions::Entity::find()
        .select_only()
        .column(bank_transactions::Column::JournalEntryId)
        .filter(bank_transactions::Column::BankAccountId.is_in(account_ids))
        .filter(bank_transactions::Column::IsReconciled.eq(true))
        .filter(bank_transactions::Column::JournalEntryId.is_not_null())
        .into_tuple()
        .all(db)
        .await?;

    Ok(linked.into_iter().flatten().collect())
}

/// Ranks posted journal entries on the bank account's GL account that
/// plausibly correspond to an unreconciled transaction.
///
/// # Errors
///
/// Returns `TransactionNotFound` if the transaction is not in the company.
pub async fn suggest_matches<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    transaction_id: Uuid,
) -> Result<Vec<MatchSuggestion>, ReconciliationStoreError> {
    let transaction = get_transaction(db, scope, transaction_id).await?;
    if transaction.is_reconciled {
        return Ok(Vec::new());
    }
    let account = get_bank_account(db, scope, transaction.bank_account_id).await?;

    let settings = MatchSettings {
        window_days: config.match_window_days,
        tolerance_percent: config.match_tolerance_percent,
    };
    let window = Days::new(u64::try_from(settings.window_days).unwrap_or(0));
    let filter = LineFilter {
        account_id: Some(account.gl_account_id),
        statuses: vec![JournalEntryStatus::Posted],
        from: transaction.transaction_date.checked_sub_days(window),
        to: transaction.transaction_date.checked_add_days(window),
    };

    let candidates: Vec<MatchCandidate> = reports::posted_lines(db, scope, &filter)
        .await?
        .into_iter()
        .map(|line| MatchCandidate {
            entry_id: line.entry_id,
            entry_number: line.entry_number,
            entry_date: line.entry_date,
            debit: line.debit,
            credit: line.credit,
        })
        .collect();
    let excluded = linked_entries(db, scope).await?;

    let suggestions = rules::suggest_matches(&to_line(&transaction), &candidates, &settings, &excluded);
    tracing::debug!(%transaction_id, count = suggestions.len(), "match suggestions computed");
    Ok(suggestions)
}
