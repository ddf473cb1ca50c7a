//! `SeaORM` entity definitions.

pub mod cuadres;
pub mod inventory_movements;
pub mod inventory_stock;
pub mod locations;
pub mod organizations;
pub mod products;
pub mod transaction_types;
