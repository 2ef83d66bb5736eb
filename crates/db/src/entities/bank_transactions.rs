//! `SeaORM` Entity for imported bank statement lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bank_account_id: Uuid,
    pub transaction_date: Date,
    pub description: String,
    pub reference: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub debit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub credit: Decimal,
    pub import_batch: String,
    pub is_reconciled: bool,
    pub journal_entry_id: Option<Uuid>,
    pub reconciliation_id: Option<Uuid>,
    pub reconciled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id"
    )]
    BankAccounts,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
