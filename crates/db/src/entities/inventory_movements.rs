//! `SeaORM` Entity for inventory_movements table.
//!
//! Append-only movement ledger. `quantity` already carries the category's
//! sign; `balance_before`/`balance_after` are snapshots taken at write time
//! and never recomputed. Rows are immutable: corrections are new movements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    /// Unique per organization: `TXN-YYYYMMDD-NNNN`.
    pub transaction_number: String,
    pub transaction_type_id: Option<Uuid>,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub product_id: Uuid,
    pub location_id: Uuid,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
    #[sea_orm(
        belongs_to = "super::transaction_types::Entity",
        from = "Column::TransactionTypeId",
        to = "super::transaction_types::Column::Id"
    )]
    TransactionTypes,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id"
    )]
    Products,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::Id"
    )]
    Locations,
}

impl Related<super::transaction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionTypes.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Locations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
