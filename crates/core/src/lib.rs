//! Core business logic for Bodega.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `inventory` - Stock ledger: movement signs, weighted-average costing, balance checks
//! - `cuadre` - Daily cash reconciliation: denomination counting and closing rules

pub mod cuadre;
pub mod inventory;
