//! `SeaORM` Entity for per-company default posting accounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "posting_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub company_id: Uuid,
    pub receivable_account_id: Option<Uuid>,
    pub payable_account_id: Option<Uuid>,
    pub sales_account_id: Option<Uuid>,
    pub purchases_account_id: Option<Uuid>,
    pub tax_payable_account_id: Option<Uuid>,
    pub tax_receivable_account_id: Option<Uuid>,
    pub cash_account_id: Option<Uuid>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
