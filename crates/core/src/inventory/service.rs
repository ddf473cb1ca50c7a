//! Movement preparation service.
//!
//! This service contains pure business logic with no database dependencies.
//! It validates a raw movement against the current stock position and
//! computes the signed quantity, balance snapshots, and new average cost
//! before anything is persisted.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::costing::weighted_average_cost;
use super::error::InventoryError;
use super::types::{PreparedMovement, StockSnapshot, TransactionTypeInfo};

/// Movement preparation and validation service.
pub struct MovementService;

impl MovementService {
    /// Validates a movement and computes its effect on a stock position.
    ///
    /// Steps:
    /// 1. Validate magnitude (positive) and unit cost (non-negative)
    /// 2. Check the transaction type is active
    /// 3. Apply the category sign to the magnitude
    /// 4. Reject if the resulting balance would be negative
    /// 5. Recalculate the weighted-average cost for cost-affecting inbound
    ///    movements; leave it unchanged otherwise
    ///
    /// The returned [`PreparedMovement`] captures `balance_before` and
    /// `balance_after` as immutable snapshots.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError` if validation fails. No state is touched on
    /// failure; callers persist nothing.
    pub fn prepare(
        type_info: &TransactionTypeInfo,
        stock: &StockSnapshot,
        magnitude: Decimal,
        unit_cost: Decimal,
    ) -> Result<PreparedMovement, InventoryError> {
        if magnitude == Decimal::ZERO {
            return Err(InventoryError::ZeroQuantity);
        }
        if magnitude < Decimal::ZERO {
            return Err(InventoryError::NegativeQuantity);
        }
        if unit_cost < Decimal::ZERO {
            return Err(InventoryError::NegativeUnitCost);
        }
        if !type_info.is_active {
            return Err(InventoryError::InactiveTransactionType(type_info.id));
        }

        let signed_quantity = type_info.category.apply_sign(magnitude);
        let balance_before = stock.quantity;
        let balance_after = balance_before + signed_quantity;

        if balance_after < Decimal::ZERO {
            return Err(InventoryError::InsufficientStock {
                available: balance_before,
                requested: magnitude,
            });
        }

        let new_average_cost = if type_info.affects_cost && signed_quantity > Decimal::ZERO {
            weighted_average_cost(
                balance_before,
                stock.average_cost,
                signed_quantity,
                unit_cost,
            )
        } else {
            stock.average_cost
        };

        Ok(PreparedMovement {
            signed_quantity,
            unit_cost,
            balance_before,
            balance_after,
            new_average_cost,
        })
    }

    /// Validates the shape of a stock transfer before its two legs are
    /// prepared.
    ///
    /// # Errors
    ///
    /// Returns an error if source and destination are the same location or
    /// the quantity is not a positive magnitude.
    pub fn validate_transfer(
        from_location_id: Uuid,
        to_location_id: Uuid,
        quantity: Decimal,
    ) -> Result<(), InventoryError> {
        if from_location_id == to_location_id {
            return Err(InventoryError::SameLocationTransfer);
        }
        if quantity == Decimal::ZERO {
            return Err(InventoryError::ZeroQuantity);
        }
        if quantity < Decimal::ZERO {
            return Err(InventoryError::NegativeQuantity);
        }
        Ok(())
    }
}
