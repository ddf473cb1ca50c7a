//! Repository abstractions for data access.

pub mod cuadre;
pub mod inventory;

#[cfg(test)]
mod cuadre_props;
#[cfg(test)]
mod inventory_props;

pub use cuadre::CuadreRepository;
pub use inventory::InventoryRepository;
