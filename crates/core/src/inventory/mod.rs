//! Stock ledger logic.
//!
//! This module implements the inventory core:
//! - Movement categories and their sign mapping
//! - Weighted-average cost recalculation
//! - Non-negative balance enforcement
//! - Transaction number formatting
//! - Transfer validation
//! - Error types for ledger operations

pub mod costing;
pub mod error;
pub mod numbering;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use costing::weighted_average_cost;
pub use error::InventoryError;
pub use numbering::{MAX_NUMBER_ATTEMPTS, TRANSACTION_NUMBER_PREFIX, format_transaction_number};
pub use service::MovementService;
pub use types::{MovementCategory, PreparedMovement, StockSnapshot, TransactionTypeInfo};
