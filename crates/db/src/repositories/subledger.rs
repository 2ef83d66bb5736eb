//! Receivables and payables repository.
//!
//! Customers, suppliers, invoices, bills and their payments, and the
//! one-time posting of each document or payment to the journal.
//!
//! Document rows carry a `version`. Every write to a document is a
//! compare-and-swap on it, so concurrent payments cannot both apply against
//! the same remaining balance.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait, UpdateMany,
};
use tally_core::accounts::PostingRole;
use tally_core::ledger::LedgerError;
use tally_core::subledger::{
    ComputedLine, DocumentKind, DocumentLineInput, DocumentStatus, DocumentTotals, PartyKind,
    PaymentMethod, SubledgerError, apply_payment, bill_posting, cancel, compute_lines,
    ensure_postable, invoice_posting, issue, payment_posting,
};
use tally_shared::config::LedgerConfig;
use tally_shared::types::{CompanyScope, UserId};
use uuid::Uuid;

use super::journal::{self, NewJournalEntry};
use super::{accounts, now, resolve_currency, sequences};
use crate::entities::sea_orm_active_enums::{
    DocumentKind as StoredKind, DocumentStatus as StoredStatus, PartyKind as StoredPartyKind,
};
use crate::entities::{bank_accounts, document_lines, documents, parties, payments};
use crate::error::SubledgerStoreError;

/// Input for creating a customer or supplier.
#[derive(Debug, Clone)]
pub struct NewParty {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// ISO currency code; defaults to the configured currency.
    pub currency: Option<String>,
}

impl NewParty {
    /// A party with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            currency: None,
        }
    }
}

/// Input for creating an invoice or bill.
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Customer (invoice) or supplier (bill).
    pub party_id: Uuid,
    /// Issue date; its year selects the number sequence.
    pub issue_date: NaiveDate,
    /// Payment due date.
    pub due_date: NaiveDate,
    /// ISO currency code; defaults to the party's currency.
    pub currency: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// At least one line.
    pub lines: Vec<DocumentLineInput>,
}

/// A document with its lines in line-number order.
#[derive(Debug, Clone)]
pub struct DocumentWithLines {
    /// The document.
    pub document: documents::Model,
    /// Its lines.
    pub lines: Vec<document_lines::Model>,
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Invoice or bill being paid.
    pub document_id: Uuid,
    /// Date the money moved.
    pub payment_date: NaiveDate,
    /// Amount paid; positive and at most the remaining balance.
    pub amount: Decimal,
    /// How the payment was made.
    pub method: PaymentMethod,
    /// External reference, e.g. a cheque number.
    pub reference: Option<String>,
    /// Bank account the money moved through.
    pub bank_account_id: Option<Uuid>,
}

/// A recorded payment and the document it settled.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The payment.
    pub payment: payments::Model,
    /// The document with its new paid amount and status.
    pub document: documents::Model,
}

fn party_not_found(kind: PartyKind, id: Uuid) -> SubledgerError {
    match kind {
        PartyKind::Customer => SubledgerError::CustomerNotFound(id),
        PartyKind::Supplier => SubledgerError::SupplierNotFound(id),
    }
}

fn scoped_documents(scope: &CompanyScope, kind: DocumentKind) -> Select<documents::Entity> {
    documents::Entity::find()
        .filter(documents::Column::TenantId.eq(scope.tenant()))
        .filter(documents::Column::CompanyId.eq(scope.company()))
        .filter(documents::Column::Kind.eq(StoredKind::from(kind)))
}

fn to_computed(line: &document_lines::Model) -> ComputedLine {
    ComputedLine {
        line_number: line.line_number,
        description: line.description.clone(),
        account_id: line.account_id,
        quantity: line.quantity,
        unit_price: line.unit_price,
        tax_rate: line.tax_rate,
        subtotal: line.subtotal,
        tax_amount: line.tax_amount,
        total: line.total,
    }
}

// ========== Parties ==========

/// Creates a customer or supplier numbered `CUST-YYYY-NNNNN` / `SUPP-YYYY-NNNNN`.
///
/// # Errors
///
/// Returns an error if the name is empty or the currency is not an ISO code.
pub async fn create_party<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    kind: PartyKind,
    input: NewParty,
) -> Result<parties::Model, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let name = input.name.trim();
    if name.is_empty() {
        return Err(SubledgerError::EmptyName.into());
    }
    let currency = resolve_currency(input.currency.as_deref(), config)
        .map_err(|_| SubledgerError::InvalidCurrency(input.currency.clone().unwrap_or_default()))?;

    let txn = db.begin().await?;
    let year = chrono::Utc::now().date_naive().year();
    let code = sequences::next_number(&txn, scope, kind.prefix(), year, config.counter_max_retries).await?;

    let now = now();
    let party = parties::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(scope.tenant()),
        company_id: Set(scope.company()),
        kind: Set(kind.into()),
        code: Set(code),
        name: Set(name.to_string()),
        email: Set(input.email),
        currency: Set(currency),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(party_id = %party.id, code = %party.code, kind = kind.as_str(), "party created");
    Ok(party)
}

/// Creates a customer.
///
/// # Errors
///
/// See [`create_party`].
pub async fn create_customer<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewParty,
) -> Result<parties::Model, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    create_party(db, scope, config, PartyKind::Customer, input).await
}

/// Creates a supplier.
///
/// # Errors
///
/// See [`create_party`].
pub async fn create_supplier<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewParty,
) -> Result<parties::Model, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    create_party(db, scope, config, PartyKind::Supplier, input).await
}

/// Finds a customer or supplier in `scope`.
///
/// # Errors
///
/// Returns `CustomerNotFound` or `SupplierNotFound` if no party of that kind
/// exists in the company.
pub async fn get_party<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    kind: PartyKind,
    id: Uuid,
) -> Result<parties::Model, SubledgerStoreError> {
    parties::Entity::find_by_id(id)
        .filter(parties::Column::TenantId.eq(scope.tenant()))
        .filter(parties::Column::CompanyId.eq(scope.company()))
        .filter(parties::Column::Kind.eq(StoredPartyKind::from(kind)))
        .one(db)
        .await?
        .ok_or_else(|| party_not_found(kind, id).into())
}

/// Lists customers or suppliers ordered by code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_parties<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    kind: PartyKind,
) -> Result<Vec<parties::Model>, SubledgerStoreError> {
    Ok(parties::Entity::find()
        .filter(parties::Column::TenantId.eq(scope.tenant()))
        .filter(parties::Column::CompanyId.eq(scope.company()))
        .filter(parties::Column::Kind.eq(StoredPartyKind::from(kind)))
        .order_by_asc(parties::Column::Code)
        .all(db)
        .await?)
}

// ========== Documents ==========

/// Creates a DRAFT invoice or bill with computed line and document totals.
///
/// # Errors
///
/// Returns an error if:
/// - The party is missing or of the wrong kind
/// - The due date is before the issue date
/// - A line is invalid or the total is zero
/// - A line account is outside the company or inactive
pub async fn create_document<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    kind: DocumentKind,
    input: NewDocument,
) -> Result<DocumentWithLines, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    if input.due_date < input.issue_date {
        return Err(SubledgerError::DueBeforeIssue.into());
    }
    let (lines, totals) = compute_lines(input.lines)?;

    let txn = db.begin().await?;
    let party = get_party(&txn, scope, kind.party_kind(), input.party_id).await?;
    let currency = match input.currency.as_deref() {
        Some(code) => resolve_currency(Some(code), config)
            .map_err(|_| SubledgerError::InvalidCurrency(code.to_string()))?,
        None => party.currency.clone(),
    };
    check_line_accounts(&txn, scope, &lines).await?;

    let number = sequences::next_number(
        &txn,
        scope,
        kind.prefix(),
        input.issue_date.year(),
        config.counter_max_retries,
    )
    .await?;

    let now = now();
    let document = documents::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(scope.tenant()),
        company_id: Set(scope.company()),
        kind: Set(kind.into()),
        number: Set(number),
        party_id: Set(party.id),
        issue_date: Set(input.issue_date),
        due_date: Set(input.due_date),
        currency: Set(currency),
        status: Set(DocumentStatus::Draft.into()),
        subtotal: Set(totals.subtotal),
        tax_total: Set(totals.tax_total),
        total: Set(totals.total),
        paid_amount: Set(Decimal::ZERO),
        version: Set(1),
        journal_entry_id: Set(None),
        notes: Set(input.notes),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let mut stored = Vec::with_capacity(lines.len());
    for line in lines {
        let model = document_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            document_id: Set(document.id),
            line_number: Set(line.line_number),
            description: Set(line.description),
            account_id: Set(line.account_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            tax_rate: Set(line.tax_rate),
            subtotal: Set(line.subtotal),
            tax_amount: Set(line.tax_amount),
            total: Set(line.total),
        }
        .insert(&txn)
        .await?;
        stored.push(model);
    }
    txn.commit().await?;

    tracing::info!(
        document_id = %document.id,
        number = %document.number,
        kind = kind.as_str(),
        total = %document.total,
        "document created"
    );
    Ok(DocumentWithLines {
        document,
        lines: stored,
    })
}

/// Creates a DRAFT invoice numbered `INV-YYYY-NNNNN`.
///
/// # Errors
///
/// See [`create_document`].
pub async fn create_invoice<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewDocument,
) -> Result<DocumentWithLines, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    create_document(db, scope, config, DocumentKind::Invoice, input).await
}

/// Creates a DRAFT bill numbered `BILL-YYYY-NNNNN`.
///
/// # Errors
///
/// See [`create_document`].
pub async fn create_bill<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewDocument,
) -> Result<DocumentWithLines, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    create_document(db, scope, config, DocumentKind::Bill, input).await
}

async fn check_line_accounts(
    txn: &DatabaseTransaction,
    scope: &CompanyScope,
    lines: &[ComputedLine],
) -> Result<(), SubledgerStoreError> {
    let ids: Vec<Uuid> = lines.iter().filter_map(|l| l.account_id).collect();
    if ids.is_empty() {
        return Ok(());
    }

    let infos = accounts::account_infos(txn, ids.iter().copied()).await?;
    for id in ids {
        let info = infos
            .get(&id)
            .filter(|a| scope.owns(a.tenant_id, a.company_id))
            .ok_or(LedgerError::AccountNotInScope(id))?;
        if !info.is_active {
            return Err(LedgerError::AccountInactive(id).into());
        }
    }
    Ok(())
}

/// Finds a document header in `scope`.
///
/// # Errors
///
/// Returns `DocumentNotFound` if no document of that kind exists in the company.
pub async fn find_document<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    kind: DocumentKind,
    id: Uuid,
) -> Result<documents::Model, SubledgerStoreError> {
    scoped_documents(scope, kind)
        .filter(documents::Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| SubledgerError::DocumentNotFound { kind, id }.into())
}

/// Finds a document and its lines.
///
/// # Errors
///
/// Returns `DocumentNotFound` if no document of that kind exists in the company.
pub async fn get_document<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    kind: DocumentKind,
    id: Uuid,
) -> Result<DocumentWithLines, SubledgerStoreError> {
    let document = find_document(db, scope, kind, id).await?;
    let lines = document_lines::Entity::find()
        .filter(document_lines::Column::DocumentId.eq(id))
        .order_by_asc(document_lines::Column::LineNumber)
        .all(db)
        .await?;
    Ok(DocumentWithLines { document, lines })
}

/// Lists documents of one kind, optionally by status, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_documents<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    kind: DocumentKind,
    status: Option<DocumentStatus>,
) -> Result<Vec<documents::Model>, SubledgerStoreError> {
    let mut query = scoped_documents(scope, kind);
    if let Some(status) = status {
        query = query.filter(documents::Column::Status.eq(StoredStatus::from(status)));
    }
    Ok(query
        .order_by_desc(documents::Column::IssueDate)
        .order_by_desc(documents::Column::Number)
        .all(db)
        .await?)
}

/// Applies `update` to the document only if its version is unchanged.
/// Returns false if another writer got there first.
async fn compare_and_set<C: ConnectionTrait>(
    db: &C,
    document: &documents::Model,
    update: UpdateMany<documents::Entity>,
) -> Result<bool, SubledgerStoreError> {
    let result = update
        .col_expr(documents::Column::Version, Expr::value(document.version + 1))
        .col_expr(documents::Column::UpdatedAt, Expr::value(now()))
        .filter(documents::Column::Id.eq(document.id))
        .filter(documents::Column::Version.eq(document.version))
        .exec(db)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Writes a new status, failing with `VersionConflict` if the document moved.
async fn set_status<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    kind: DocumentKind,
    document: &documents::Model,
    status: DocumentStatus,
) -> Result<documents::Model, SubledgerStoreError> {
    let update = documents::Entity::update_many()
        .col_expr(documents::Column::Status, Expr::value(StoredStatus::from(status)));
    if !compare_and_set(db, document, update).await? {
        return Err(SubledgerError::VersionConflict {
            kind,
            id: document.id,
        }
        .into());
    }
    find_document(db, scope, kind, document.id).await
}

async fn issue_document<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    kind: DocumentKind,
    id: Uuid,
) -> Result<documents::Model, SubledgerStoreError> {
    let document = find_document(db, scope, kind, id).await?;
    let status = issue(kind, document.status.into())?;

    let document = set_status(db, scope, kind, &document, status).await?;
    tracing::info!(document_id = %id, number = %document.number, status = %status, "document issued");
    Ok(document)
}

/// Sends a DRAFT invoice.
///
/// # Errors
///
/// Returns an error if the invoice is not found or not DRAFT.
pub async fn send_invoice<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<documents::Model, SubledgerStoreError> {
    issue_document(db, scope, DocumentKind::Invoice, id).await
}

/// Approves a DRAFT bill.
///
/// # Errors
///
/// Returns an error if the bill is not found or not DRAFT.
pub async fn approve_bill<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<documents::Model, SubledgerStoreError> {
    issue_document(db, scope, DocumentKind::Bill, id).await
}

/// Cancels a document that is unpaid and not posted.
///
/// # Errors
///
/// Returns an error if the document is not found, has payments, has been
/// posted, or is already settled or cancelled.
pub async fn cancel_document<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    kind: DocumentKind,
    id: Uuid,
) -> Result<documents::Model, SubledgerStoreError> {
    let document = find_document(db, scope, kind, id).await?;
    let status = cancel(document.status.into(), document.paid_amount, document.journal_entry_id)?;

    let document = set_status(db, scope, kind, &document, status).await?;
    tracing::info!(document_id = %id, number = %document.number, "document cancelled");
    Ok(document)
}

/// Marks issued or partly paid documents due before `as_of` as OVERDUE.
/// Returns the number of documents changed.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub async fn mark_overdue<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    as_of: NaiveDate,
) -> Result<u64, SubledgerStoreError> {
    let open = [DocumentStatus::Sent, DocumentStatus::Approved, DocumentStatus::Partial]
        .map(StoredStatus::from);

    let result = documents::Entity::update_many()
        .col_expr(documents::Column::Status, Expr::value(StoredStatus::Overdue))
        .col_expr(documents::Column::Version, Expr::col(documents::Column::Version).add(1))
        .col_expr(documents::Column::UpdatedAt, Expr::value(now()))
        .filter(documents::Column::TenantId.eq(scope.tenant()))
        .filter(documents::Column::CompanyId.eq(scope.company()))
        .filter(documents::Column::Status.is_in(open))
        .filter(documents::Column::DueDate.lt(as_of))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(count = result.rows_affected, %as_of, "documents marked overdue");
    }
    Ok(result.rows_affected)
}

// ========== Ledger posting ==========

/// Posts an issued invoice or bill to the journal, once.
///
/// The entry is dated on the issue date and created already POSTED, so the
/// usual period and account checks apply.
///
/// # Errors
///
/// Returns an error if:
/// - The document is missing, DRAFT, CANCELLED or already posted
/// - A posting account the document needs is not configured
/// - The journal rejects the entry (closed period, inactive account)
pub async fn post_document<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    kind: DocumentKind,
    id: Uuid,
    posted_by: UserId,
) -> Result<documents::Model, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let DocumentWithLines { document, lines } = get_document(&txn, scope, kind, id).await?;
    ensure_postable(document.status.into(), document.journal_entry_id)?;

    let party = get_party(&txn, scope, kind.party_kind(), document.party_id).await?;
    let posting = accounts::posting_accounts(&txn, scope).await?;
    let computed: Vec<ComputedLine> = lines.iter().map(to_computed).collect();
    let totals = DocumentTotals {
        subtotal: document.subtotal,
        tax_total: document.tax_total,
        total: document.total,
    };
    let draft = match kind {
        DocumentKind::Invoice => invoice_posting(&document.number, &party.name, &computed, &totals, &posting)?,
        DocumentKind::Bill => bill_posting(&document.number, &party.name, &computed, &totals, &posting)?,
    };

    let entry = journal::create_and_post(
        &txn,
        scope,
        config,
        NewJournalEntry {
            entry_date: document.issue_date,
            entry_type: draft.entry_type,
            description: draft.description,
            reference: Some(draft.reference),
            source: Some(format!("{kind}:{id}")),
            lines: draft.lines,
            created_by: Some(posted_by),
        },
        posted_by,
    )
    .await?;

    let update = documents::Entity::update_many()
        .col_expr(documents::Column::JournalEntryId, Expr::value(entry.entry.id));
    if !compare_and_set(&txn, &document, update).await? {
        return Err(SubledgerError::VersionConflict { kind, id }.into());
    }
    let document = find_document(&txn, scope, kind, id).await?;
    txn.commit().await?;

    tracing::info!(
        document_id = %id,
        number = %document.number,
        entry_number = %entry.entry.entry_number,
        "document posted to ledger"
    );
    Ok(document)
}

/// Posts an invoice to the ledger.
///
/// # Errors
///
/// See [`post_document`].
pub async fn post_invoice<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    id: Uuid,
    posted_by: UserId,
) -> Result<documents::Model, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    post_document(db, scope, config, DocumentKind::Invoice, id, posted_by).await
}

/// Posts a bill to the ledger.
///
/// # Errors
///
/// See [`post_document`].
pub async fn post_bill<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    id: Uuid,
    posted_by: UserId,
) -> Result<documents::Model, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    post_document(db, scope, config, DocumentKind::Bill, id, posted_by).await
}

// ========== Payments ==========

async fn find_bank_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<bank_accounts::Model, SubledgerStoreError> {
    bank_accounts::Entity::find_by_id(id)
        .filter(bank_accounts::Column::TenantId.eq(scope.tenant()))
        .filter(bank_accounts::Column::CompanyId.eq(scope.company()))
        .one(db)
        .await?
        .ok_or_else(|| SubledgerError::BankAccountNotFound(id).into())
}

/// Records a payment against an invoice or bill.
///
/// The document's paid amount and status are updated with a version check;
/// if another payment lands first the attempt is retried against the fresh
/// balance, up to the configured number of attempts.
///
/// # Errors
///
/// Returns an error if:
/// - The document is missing or does not accept payments
/// - The amount is not positive or exceeds the remaining balance
/// - The bank account is not in the company
/// - Every attempt lost the race (`VersionConflict`)
pub async fn record_payment<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    kind: DocumentKind,
    input: NewPayment,
) -> Result<RecordedPayment, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let attempts = config.counter_max_retries.max(1);

    for attempt in 1..=attempts {
        let txn = db.begin().await?;
        let document = find_document(&txn, scope, kind, input.document_id).await?;
        let outcome = apply_payment(
            document.status.into(),
            document.total,
            document.paid_amount,
            input.amount,
        )?;
        if let Some(bank_account_id) = input.bank_account_id {
            find_bank_account(&txn, scope, bank_account_id).await?;
        }

        let update = documents::Entity::update_many()
            .col_expr(documents::Column::PaidAmount, Expr::value(outcome.paid_amount))
            .col_expr(documents::Column::Status, Expr::value(StoredStatus::from(outcome.status)));
        if !compare_and_set(&txn, &document, update).await? {
            txn.rollback().await?;
            tracing::warn!(document_id = %document.id, attempt, "document changed during payment, retrying");
            continue;
        }

        let number = sequences::next_number(
            &txn,
            scope,
            kind.payment_prefix(),
            input.payment_date.year(),
            config.counter_max_retries,
        )
        .await?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(scope.tenant()),
            company_id: Set(scope.company()),
            kind: Set(kind.into()),
            number: Set(number),
            document_id: Set(document.id),
            payment_date: Set(input.payment_date),
            amount: Set(input.amount),
            method: Set(input.method.into()),
            reference: Set(input.reference.clone()),
            bank_account_id: Set(input.bank_account_id),
            journal_entry_id: Set(None),
            created_at: Set(now()),
        }
        .insert(&txn)
        .await?;
        let document = find_document(&txn, scope, kind, document.id).await?;
        txn.commit().await?;

        tracing::info!(
            payment_id = %payment.id,
            number = %payment.number,
            document_number = %document.number,
            amount = %payment.amount,
            remaining = %outcome.remaining,
            status = %outcome.status,
            "payment recorded"
        );
        return Ok(RecordedPayment { payment, document });
    }

    Err(SubledgerError::VersionConflict {
        kind,
        id: input.document_id,
    }
    .into())
}

/// Finds a payment in `scope`.
///
/// # Errors
///
/// Returns `PaymentNotFound` if the payment does not exist in the company.
pub async fn get_payment<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<payments::Model, SubledgerStoreError> {
    payments::Entity::find_by_id(id)
        .filter(payments::Column::TenantId.eq(scope.tenant()))
        .filter(payments::Column::CompanyId.eq(scope.company()))
        .one(db)
        .await?
        .ok_or_else(|| SubledgerError::PaymentNotFound(id).into())
}

/// Lists the payments made against a document, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_payments<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    document_id: Uuid,
) -> Result<Vec<payments::Model>, SubledgerStoreError> {
    Ok(payments::Entity::find()
        .filter(payments::Column::TenantId.eq(scope.tenant()))
        .filter(payments::Column::CompanyId.eq(scope.company()))
        .filter(payments::Column::DocumentId.eq(document_id))
        .order_by_asc(payments::Column::PaymentDate)
        .order_by_asc(payments::Column::Number)
        .all(db)
        .await?)
}

/// Posts a payment to the journal, once.
///
/// Cash is the bank account's GL account when the payment names one, else
/// the company's cash posting account.
///
/// # Errors
///
/// Returns an error if the payment is missing or already posted, a posting
/// account is not configured, or the journal rejects the entry.
pub async fn post_payment<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    id: Uuid,
    posted_by: UserId,
) -> Result<payments::Model, SubledgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let payment = get_payment(&txn, scope, id).await?;
    if let Some(entry_id) = payment.journal_entry_id {
        return Err(SubledgerError::AlreadyPosted(entry_id).into());
    }

    let kind: DocumentKind = payment.kind.into();
    let document = find_document(&txn, scope, kind, payment.document_id).await?;
    let posting = accounts::posting_accounts(&txn, scope).await?;
    let cash = match payment.bank_account_id {
        Some(bank_account_id) => find_bank_account(&txn, scope, bank_account_id).await?.gl_account_id,
        None => posting.require(PostingRole::Cash)?,
    };
    let draft = payment_posting(kind, &payment.number, &document.number, payment.amount, cash, &posting)?;

    let entry = journal::create_and_post(
        &txn,
        scope,
        config,
        NewJournalEntry {
            entry_date: payment.payment_date,
            entry_type: draft.entry_type,
            description: draft.description,
            reference: Some(draft.reference),
            source: Some(format!("payment:{id}")),
            lines: draft.lines,
            created_by: Some(posted_by),
        },
        posted_by,
    )
    .await?;

    let claimed = payments::Entity::update_many()
        .col_expr(payments::Column::JournalEntryId, Expr::value(entry.entry.id))
        .filter(payments::Column::Id.eq(id))
        .filter(payments::Column::JournalEntryId.is_null())
        .exec(&txn)
        .await?;
    if claimed.rows_affected != 1 {
        txn.rollback().await?;
        let current = get_payment(db, scope, id).await?;
        tracing::warn!(payment_id = %id, "payment posted concurrently, entry discarded");
        return Err(SubledgerError::AlreadyPosted(current.journal_entry_id.unwrap_or(entry.entry.id)).into());
    }
    let payment = get_payment(&txn, scope, id).await?;
    txn.commit().await?;

    tracing::info!(
        payment_id = %id,
        number = %payment.number,
        entry_number = %entry.entry.entry_number,
        "payment posted to ledger"
    );
    Ok(payment)
}
