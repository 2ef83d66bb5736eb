//! Document number counters.
//!
//! One row per company and scope (`JE-2026`, `INV-2026`, ...) holds the last
//! issued sequence and a version. Taking a number is a compare-and-swap on
//! that version, retried a bounded number of times, so two writers can never
//! both commit the same number. A counter's first use seeds it from the
//! highest number already stored for the scope.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
    Set, SqlErr, TransactionTrait,
};
use tally_core::ledger::{DocumentPrefix, LedgerError, format_number, max_sequence};
use tally_shared::types::CompanyScope;
use uuid::Uuid;

use super::now;
use crate::entities::{documents, journal_entries, number_sequences, parties, payments};
use crate::error::LedgerStoreError;

/// Takes the next number for `prefix` in `year`, e.g. `JE-2026-00007`.
///
/// # Errors
///
/// Returns `SequenceContention` when every attempt lost the race to a
/// concurrent writer, or a database error.
pub async fn next_number<C>(
    db: &C,
    scope: &CompanyScope,
    prefix: DocumentPrefix,
    year: i32,
    max_retries: u32,
) -> Result<String, LedgerStoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let key = prefix.scope(year);
    let attempts = max_retries.max(1);

    for attempt in 1..=attempts {
        let counter = number_sequences::Entity::find()
            .filter(number_sequences::Column::TenantId.eq(scope.tenant()))
            .filter(number_sequences::Column::CompanyId.eq(scope.company()))
            .filter(number_sequences::Column::Scope.eq(&key))
            .one(db)
            .await?;

        let Some(counter) = counter else {
            let next = stored_max(db, scope, prefix, year).await? + 1;
            if seed(db, scope, &key, next).await? {
                return Ok(format_number(prefix, year, next));
            }
            tracing::warn!(scope = %key, attempt, "number sequence seeded concurrently, retrying");
            continue;
        };

        let next = to_sequence(counter.last_value)? + 1;
        let result = number_sequences::Entity::update_many()
            .col_expr(number_sequences::Column::LastValue, Expr::value(to_column(next)?))
            .col_expr(number_sequences::Column::Version, Expr::value(counter.version + 1))
            .col_expr(number_sequences::Column::UpdatedAt, Expr::value(now()))
            .filter(number_sequences::Column::Id.eq(counter.id))
            .filter(number_sequences::Column::Version.eq(counter.version))
            .exec(db)
            .await?;

        if result.rows_affected == 1 {
            return Ok(format_number(prefix, year, next));
        }
        tracing::warn!(scope = %key, attempt, "number sequence version changed, retrying");
    }

    Err(LedgerError::SequenceContention {
        scope: key,
        attempts,
    }
    .into())
}

/// Inserts the counter row at `value`. Returns false if another writer
/// created it first.
async fn seed<C>(db: &C, scope: &CompanyScope, key: &str, value: u32) -> Result<bool, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    // Savepoint: a failed insert must not poison an enclosing transaction.
    let txn = db.begin().await?;
    let inserted = number_sequences::ActiveModel {
        id: Set(Uuid::new_v4()),
        tenant_id: Set(scope.tenant()),
        company_id: Set(scope.company()),
        scope: Set(key.to_string()),
        last_value: Set(to_column(value)?),
        version: Set(1),
        updated_at: Set(now()),
    }
    .insert(&txn)
    .await;

    match inserted {
        Ok(_) => {
            txn.commit().await?;
            Ok(true)
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            txn.rollback().await?;
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Highest sequence already used for `prefix` in `year`.
async fn stored_max<C: ConnectionTrait>(
    db: &C,
    scope: &CompanyScope,
    prefix: DocumentPrefix,
    year: i32,
) -> Result<u32, DbErr> {
    let pattern = format!("{}-", prefix.scope(year));

    let numbers: Vec<String> = match prefix {
        DocumentPrefix::JournalEntry => {
            journal_entries::Entity::find()
                .select_only()
                .column(journal_entries::Column::EntryNumber)
                .filter(journal_entries::Column::TenantId.eq(scope.tenant()))
                .filter(journal_entries::Column::CompanyId.eq(scope.company()))
                .filter(journal_entries::Column::EntryNumber.starts_with(&pattern))
                .into_tuple()
                .all(db)
                .await?
        }
        DocumentPrefix::Invoice | DocumentPrefix::Bill => {
            documents::Entity::find()
                .select_only()
                .column(documents::Column::Number)
                .filter(documents::Column::TenantId.eq(scope.tenant()))
                .filter(documents::Column::CompanyId.eq(scope.company()))
                .filter(documents::Column::Number.starts_with(&pattern))
                .into_tuple()
                .all(db)
                .await?
        }
        DocumentPrefix::CustomerPayment | DocumentPrefix::SupplierPayment => {
            payments::Entity::find()
                .select_only()
                .column(payments::Column::Number)
                .filter(payments::Column::TenantId.eq(scope.tenant()))
                .filter(payments::Column::CompanyId.eq(scope.company()))
                .filter(payments::Column::Number.starts_with(&pattern))
                .into_tuple()
                .all(db)
                .await?
        }
        DocumentPrefix::Customer | DocumentPrefix::Supplier => {
            parties::Entity::find()
                .select_only()
                .column(parties::Column::Code)
                .filter(parties::Column::TenantId.eq(scope.tenant()))
                .filter(parties::Column::CompanyId.eq(scope.company()))
                .filter(parties::Column::Code.starts_with(&pattern))
                .into_tuple()
                .all(db)
                .await?
        }
    };

    Ok(max_sequence(numbers.iter().map(String::as_str), prefix, year))
}

fn to_sequence(value: i32) -> Result<u32, DbErr> {
    u32::try_from(value).map_err(|_| DbErr::Custom(format!("negative sequence value {value}")))
}

fn to_column(value: u32) -> Result<i32, DbErr> {
    i32::try_from(value).map_err(|_| DbErr::Custom(format!("sequence value {value} out of range")))
}
