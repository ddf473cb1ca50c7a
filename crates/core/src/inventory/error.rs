//! Error types for inventory ledger operations.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while preparing or validating a stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Movement quantity must be a positive magnitude.
    #[error("Movement quantity must be greater than zero")]
    ZeroQuantity,

    /// Movement quantity must be a positive magnitude.
    #[error("Movement quantity must not be negative")]
    NegativeQuantity,

    /// Unit cost must not be negative.
    #[error("Unit cost must not be negative")]
    NegativeUnitCost,

    /// The transaction type is not active.
    #[error("Transaction type {0} is inactive")]
    InactiveTransactionType(Uuid),

    /// The movement would drive the stock balance negative.
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// Quantity on hand before the movement.
        available: Decimal,
        /// Magnitude requested.
        requested: Decimal,
    },

    /// Transfers require two distinct locations.
    #[error("Transfer source and destination locations must differ")]
    SameLocationTransfer,
}
