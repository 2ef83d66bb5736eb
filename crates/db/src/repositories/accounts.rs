//! Chart of accounts repository.
//!
//! Account creation, hierarchy edits, activation, guarded deletion, the
//! default chart installed for new companies, and the company's posting
//! settings.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use tally_core::accounts::{
    AccountError, AccountInfo, AccountType, BalanceClass, DEFAULT_CHART, PostingRole,
    creates_cycle, ensure_deletable, ensure_editable, ensure_parent_in_scope,
    ensure_type_change_allowed, validate_code,
};
use tally_core::subledger::PostingAccounts;
use tally_shared::config::LedgerConfig;
use tally_shared::types::CompanyScope;
use uuid::Uuid;

use super::{now, resolve_currency};
use crate::entities::{accounts, journal_lines, posting_settings};
use crate::error::AccountStoreError;

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Account code, unique within the company.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Account type.
    pub account_type: AccountType,
    /// Balance-sheet bucket; defaults by type when omitted.
    pub balance_class: Option<BalanceClass>,
    /// Parent account in the same company.
    pub parent_id: Option<Uuid>,
    /// ISO currency code; defaults to the configured currency.
    pub currency: Option<String>,
}

impl NewAccount {
    /// A top-level account with no description and the default currency.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            account_type,
            balance_class: None,
            parent_id: None,
            currency: None,
        }
    }

    /// Places the account under `parent_id`.
    #[must_use]
    pub const fn under(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Changes applied by [`update_account`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    /// New code.
    pub code: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// New description (`Some(None)` clears it).
    pub description: Option<Option<String>>,
    /// New type; rejected once journal lines reference the account.
    pub account_type: Option<AccountType>,
    /// New balance class (`Some(None)` clears it).
    pub balance_class: Option<Option<BalanceClass>>,
    /// New parent (`Some(None)` makes the account a root).
    pub parent_id: Option<Option<Uuid>>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
    /// Filter by parent ID (`Some(None)` = root accounts only).
    pub parent_id: Option<Option<Uuid>>,
}

fn scoped(scope: &CompanyScope) -> Select<accounts::Entity> {
    accounts::Entity::find()
        .filter(accounts::Column::TenantId.eq(scope.tenant()))
        .filter(accounts::Column::CompanyId.eq(scope.company()))
}

fn to_info(account: &accounts::Model) -> AccountInfo {
    AccountInfo {
        id: account.id,
        tenant_id: account.tenant_id,
        company_id: account.company_id,
        account_type: account.account_type.into(),
        is_active: account.is_active,
    }
}

async fn ensure_code_free<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    code: &str,
) -> Result<(), AccountStoreError> {
    let existing = scoped(scope)
        .filter(accounts::Column::Code.eq(code))
        .one(db)
        .await?;

    if existing.is_some() {
        return Err(AccountError::DuplicateCode(code.to_string()).into());
    }
    Ok(())
}

async fn count_lines<C: ConnectionTrait>(db: &C, account_id: Uuid) -> Result<u64, DbErr> {
    journal_lines::Entity::find()
        .filter(journal_lines::Column::AccountId.eq(account_id))
        .count(db)
        .await
}

/// Loads the parent and checks that it lives in `scope`.
async fn load_parent<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    parent_id: Uuid,
) -> Result<accounts::Model, AccountStoreError> {
    let parent = accounts::Entity::find_by_id(parent_id)
        .one(db)
        .await?
        .ok_or(AccountError::ParentNotFound(parent_id))?;

    ensure_parent_in_scope(scope, parent.id, parent.tenant_id, parent.company_id)?;
    Ok(parent)
}

/// Creates an account.
///
/// # Errors
///
/// Returns an error if:
/// - The code is malformed or already used in the company
/// - The name is empty or the currency is not an ISO code
/// - The parent does not exist or belongs to another company
pub async fn create_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
    input: NewAccount,
) -> Result<accounts::Model, AccountStoreError> {
    validate_code(&input.code)?;
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AccountError::EmptyName.into());
    }
    let currency = resolve_currency(input.currency.as_deref(), config)
        .map_err(|_| AccountError::InvalidCurrency(input.currency.clone().unwrap_or_default()))?;

    ensure_code_free(db, scope, &input.code).await?;
    if let Some(parent_id) = input.parent_id {
        load_parent(db, scope, parent_id).await?;
    }

    let balance_class = input
        .balance_class
        .or_else(|| BalanceClass::default_for(input.account_type));

    let now = now();
    let account = accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(scope.tenant()),
        company_id: Set(scope.company()),
        code: Set(input.code),
        name: Set(name.to_string()),
        description: Set(input.description),
        account_type: Set(input.account_type.into()),
        balance_class: Set(balance_class.map(Into::into)),
        parent_id: Set(input.parent_id),
        currency: Set(currency),
        is_active: Set(true),
        is_system: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    tracing::info!(account_id = %account.id, code = %account.code, "account created");
    Ok(account)
}

/// Finds an account in `scope`.
///
/// # Errors
///
/// Returns `AccountNotFound` if the account does not exist in the company.
pub async fn get_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<accounts::Model, AccountStoreError> {
    scoped(scope)
        .filter(accounts::Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| AccountError::AccountNotFound(id).into())
}

/// Finds an account by code in `scope`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn find_by_code<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    code: &str,
) -> Result<Option<accounts::Model>, DbErr> {
    scoped(scope)
        .filter(accounts::Column::Code.eq(code))
        .one(db)
        .await
}

/// Lists the company's accounts ordered by code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn list_accounts<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    filter: AccountFilter,
) -> Result<Vec<accounts::Model>, DbErr> {
    let mut query = scoped(scope).order_by_asc(accounts::Column::Code);

    if let Some(account_type) = filter.account_type {
        query = query.filter(accounts::Column::AccountType.eq(stored_type(account_type)));
    }
    if let Some(is_active) = filter.is_active {
        query = query.filter(accounts::Column::IsActive.eq(is_active));
    }
    match filter.parent_id {
        Some(Some(parent_id)) => query = query.filter(accounts::Column::ParentId.eq(parent_id)),
        Some(None) => query = query.filter(accounts::Column::ParentId.is_null()),
        None => {}
    }

    query.all(db).await
}

fn stored_type(account_type: AccountType) -> crate::entities::sea_orm_active_enums::AccountType {
    account_type.into()
}

/// Updates an account.
///
/// # Errors
///
/// Returns an error if:
/// - The account is not found or is a system account
/// - The new code is malformed or taken
/// - The type changes while journal lines reference the account
/// - The new parent is missing, in another company, or would form a cycle
pub async fn update_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
    input: AccountUpdate,
) -> Result<accounts::Model, AccountStoreError> {
    let account = get_account(db, scope, id).await?;
    ensure_editable(account.id, account.is_system)?;

    if let Some(code) = &input.code
        && *code != account.code
    {
        validate_code(code)?;
        ensure_code_free(db, scope, code).await?;
    }

    if let Some(name) = &input.name
        && name.trim().is_empty()
    {
        return Err(AccountError::EmptyName.into());
    }

    if let Some(account_type) = input.account_type
        && stored_type(account_type) != account.account_type
    {
        ensure_type_change_allowed(id, count_lines(db, id).await?)?;
    }

    if let Some(Some(parent_id)) = input.parent_id {
        if parent_id == id {
            return Err(AccountError::ParentCycle(parent_id).into());
        }
        load_parent(db, scope, parent_id).await?;

        let parents: HashMap<Uuid, Option<Uuid>> = scoped(scope)
            .all(db)
            .await?
            .into_iter()
            .map(|a| (a.id, a.parent_id))
            .collect();
        if creates_cycle(id, parent_id, &parents) {
            return Err(AccountError::ParentCycle(parent_id).into());
        }
    }

    let mut active: accounts::ActiveModel = account.into();
    if let Some(code) = input.code {
        active.code = Set(code);
    }
    if let Some(name) = input.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(account_type) = input.account_type {
        active.account_type = Set(account_type.into());
    }
    if let Some(balance_class) = input.balance_class {
        active.balance_class = Set(balance_class.map(Into::into));
    }
    if let Some(parent_id) = input.parent_id {
        active.parent_id = Set(parent_id);
    }
    active.updated_at = Set(now());

    Ok(active.update(db).await?)
}

/// Activates or deactivates an account.
///
/// Deactivation is the supported alternative to deleting an account that
/// journal lines reference. Inactive accounts reject new lines.
///
/// # Errors
///
/// Returns an error if the account is not found or is a system account.
pub async fn set_active<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
    is_active: bool,
) -> Result<accounts::Model, AccountStoreError> {
    let account = get_account(db, scope, id).await?;
    ensure_editable(account.id, account.is_system)?;

    let mut active: accounts::ActiveModel = account.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(now());
    let account = active.update(db).await?;

    tracing::info!(account_id = %id, is_active, "account activation changed");
    Ok(account)
}

/// Deletes an account that nothing references.
///
/// # Errors
///
/// Returns an error if the account is not found, is a system account, or
/// has journal lines or child accounts.
pub async fn delete_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    id: Uuid,
) -> Result<(), AccountStoreError> {
    let account = get_account(db, scope, id).await?;

    let line_count = count_lines(db, id).await?;
    let child_count = scoped(scope)
        .filter(accounts::Column::ParentId.eq(id))
        .count(db)
        .await?;
    ensure_deletable(id, account.is_system, line_count, child_count)?;

    accounts::Entity::delete_by_id(id).exec(db).await?;
    tracing::info!(account_id = %id, code = %account.code, "account deleted");
    Ok(())
}

/// Loads what the ledger needs to validate lines against `ids`.
///
/// Accounts are looked up without a scope filter so that foreign accounts
/// are reported as out of scope rather than missing.
pub(crate) async fn account_infos<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, AccountInfo>, DbErr> {
    let accounts = accounts::Entity::find()
        .filter(accounts::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(accounts.iter().map(|a| (a.id, to_info(a))).collect())
}

/// Installs the default chart of accounts and posting settings.
///
/// Accounts whose code already exists are kept as they are, so running this
/// twice creates nothing new. Returns the posting accounts now configured.
///
/// # Errors
///
/// Returns an error if the database operations fail.
pub async fn setup_default_chart<C>(
    db: &C,
    scope: &CompanyScope,
    config: &LedgerConfig,
) -> Result<PostingAccounts, AccountStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let currency = resolve_currency(None, config)
        .map_err(|_| AccountError::InvalidCurrency(config.default_currency.clone()))?;

    let txn = db.begin().await?;

    let mut by_code: HashMap<String, Uuid> = scoped(scope)
        .all(&txn)
        .await?
        .into_iter()
        .map(|a| (a.code, a.id))
        .collect();

    let mut created = 0_usize;
    let mut posting = posting_accounts(&txn, scope).await?;

    for template in DEFAULT_CHART {
        let id = if let Some(id) = by_code.get(template.code) {
            *id
        } else {
            let parent_id = template
                .parent_code
                .and_then(|code| by_code.get(code).copied());
            let now = now();
            let account = accounts::ActiveModel {
                id: Set(Uuid::new_v4()),
                tenant_id: Set(scope.tenant()),
                company_id: Set(scope.company()),
                code: Set(template.code.to_string()),
                name: Set(template.name.to_string()),
                description: Set(None),
                account_type: Set(template.account_type.into()),
                balance_class: Set(template.balance_class.map(Into::into)),
                parent_id: Set(parent_id),
                currency: Set(currency.clone()),
                is_active: Set(true),
                is_system: Set(template.is_system),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;
            created += 1;
            by_code.insert(account.code, account.id);
            account.id
        };

        if let Some(role) = template.role
            && posting.get(role).is_none()
        {
            posting.set(role, id);
        }
    }

    save_posting_accounts(&txn, scope, &posting).await?;
    txn.commit().await?;

    tracing::info!(
        tenant_id = %scope.tenant(),
        company_id = %scope.company(),
        created,
        "default chart of accounts installed"
    );
    Ok(posting)
}

/// The company's posting accounts; unset roles are `None`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn posting_accounts<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
) -> Result<PostingAccounts, DbErr> {
    let settings = find_settings(db, scope).await?;

    Ok(settings.map_or_else(PostingAccounts::default, |s| PostingAccounts {
        receivable: s.receivable_account_id,
        payable: s.payable_account_id,
        sales: s.sales_account_id,
        purchases: s.purchases_account_id,
        tax_payable: s.tax_payable_account_id,
        tax_receivable: s.tax_receivable_account_id,
        cash: s.cash_account_id,
    }))
}

/// Points a posting role at an active account of the company.
///
/// # Errors
///
/// Returns an error if the account is not found in the company.
pub async fn set_posting_account<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    role: PostingRole,
    account_id: Uuid,
) -> Result<PostingAccounts, AccountStoreError> {
    let account = get_account(db, scope, account_id).await?;
    if !account.is_active {
        return Err(AccountError::AccountNotFound(account_id).into());
    }

    let mut posting = posting_accounts(db, scope).await?;
    posting.set(role, account_id);
    save_posting_accounts(db, scope, &posting).await?;

    tracing::info!(%role, %account_id, "posting account set");
    Ok(posting)
}

async fn find_settings<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
) -> Result<Option<posting_settings::Model>, DbErr> {
    posting_settings::Entity::find()
        .filter(posting_settings::Column::TenantId.eq(scope.tenant()))
        .filter(posting_settings::Column::CompanyId.eq(scope.company()))
        .one(db)
        .await
}

async fn save_posting_accounts<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    posting: &PostingAccounts,
) -> Result<(), DbErr> {
    let existing = find_settings(db, scope).await?;
    let is_new = existing.is_none();
    let mut active: posting_settings::ActiveModel = match existing {
        Some(settings) => settings.into(),
        None => posting_settings::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(scope.tenant()),
            company_id: Set(scope.company()),
            ..Default::default()
        },
    };

    active.receivable_account_id = Set(posting.receivable);
    active.payable_account_id = Set(posting.payable);
    active.sales_account_id = Set(posting.sales);
    active.purchases_account_id = Set(posting.purchases);
    active.tax_payable_account_id = Set(posting.tax_payable);
    active.tax_receivable_account_id = Set(posting.tax_receivable);
    active.cash_account_id = Set(posting.cash);
    active.updated_at = Set(now());

    if is_new {
        active.insert(db).await?;
    } else {
        active.update(db).await?;
    }
    Ok(())
}
