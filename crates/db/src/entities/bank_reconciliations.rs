//! `SeaORM` Entity for bank reconciliations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ReconciliationStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_reconciliations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub company_id: Uuid,
    pub bank_account_id: Uuid,
    pub statement_date: Date,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub statement_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub gl_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub adjusted_gl_balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub difference: Decimal,
    pub status: ReconciliationStatus,
    pub completed_at: Option<DateTimeWithTimeZone>,
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
