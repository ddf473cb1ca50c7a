//! `SeaORM` Entity for transaction_types table.
//!
//! The `category` column is the configuration table that maps a movement
//! to its sign; see `bodega_core::inventory::MovementCategory`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Null for predefined system types shared by every organization.
    pub organization_id: Option<Uuid>,
    pub code: String,
    pub name: String,
    pub category: String,
    pub affects_cost: bool,
    pub is_system: bool,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
    #[sea_orm(has_many = "super::inventory_movements::Entity")]
    InventoryMovements,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::inventory_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
