//! `SeaORM` Entity for cuadres table.
//!
//! One reconciliation record per (organization, date). The calculated
//! balance and difference are NOT stored columns; the application derives
//! them at read time from the authoritative fields below.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cuadres")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub date: Date,
    pub opening_balance: Decimal,
    pub income_cash: Decimal,
    pub income_transfer: Decimal,
    pub income_card: Decimal,
    pub expense_cash: Decimal,
    pub expense_transfer: Decimal,
    pub expense_card: Decimal,
    /// Manually counted cash total, from the denomination breakdown.
    pub physical_balance: Option<Decimal>,
    pub observations: Option<String>,
    /// Once true the record is immutable.
    pub closed: bool,
    pub created_by: Option<Uuid>,
    pub closed_by: Option<Uuid>,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
