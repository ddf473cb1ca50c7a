//! Inventory domain types for movement preparation and validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Movement category determining the sign applied to a raw quantity.
///
/// Categories are configured on transaction type rows, never inferred from
/// the magnitude. The original taxonomy carried bare `adjustment` and
/// `transfer` categories whose direction was ambiguous; they are split into
/// directional variants so the category-to-sign mapping is a total function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementCategory {
    /// Inbound stock (purchase receipt, return to stock).
    In,
    /// Outbound stock (sale, consumption).
    Out,
    /// Manual adjustment increasing stock.
    AdjustmentIn,
    /// Manual adjustment decreasing stock.
    AdjustmentOut,
    /// Inbound leg of a location transfer.
    TransferIn,
    /// Outbound leg of a location transfer.
    TransferOut,
}

impl MovementCategory {
    /// Returns true if the category increases stock.
    #[must_use]
    pub const fn is_inbound(self) -> bool {
        matches!(self, Self::In | Self::AdjustmentIn | Self::TransferIn)
    }

    /// Applies the category's sign to a positive magnitude.
    #[must_use]
    pub fn apply_sign(self, magnitude: Decimal) -> Decimal {
        if self.is_inbound() { magnitude } else { -magnitude }
    }

    /// Stable string form stored in the transaction type table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::AdjustmentIn => "adjustment_in",
            Self::AdjustmentOut => "adjustment_out",
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
        }
    }

    /// Parses the stored string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in" => Some(Self::In),
            "out" => Some(Self::Out),
            "adjustment_in" => Some(Self::AdjustmentIn),
            "adjustment_out" => Some(Self::AdjustmentOut),
            "transfer_in" => Some(Self::TransferIn),
            "transfer_out" => Some(Self::TransferOut),
            _ => None,
        }
    }
}

/// Information about a transaction type needed for movement preparation.
#[derive(Debug, Clone)]
pub struct TransactionTypeInfo {
    /// The transaction type ID.
    pub id: Uuid,
    /// The movement category configured on the type.
    pub category: MovementCategory,
    /// Whether inbound movements of this type recalculate average cost.
    pub affects_cost: bool,
    /// Whether the type is active.
    pub is_active: bool,
}

/// Snapshot of a stock position at the moment a movement is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockSnapshot {
    /// Current on-hand quantity.
    pub quantity: Decimal,
    /// Current weighted-average unit cost.
    pub average_cost: Decimal,
}

impl StockSnapshot {
    /// A fresh position with no stock and no cost history.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
        }
    }
}

/// A validated movement ready to be persisted.
///
/// Balance and cost snapshots are captured here and never recomputed
/// retroactively once the movement is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedMovement {
    /// Quantity with the category's sign applied.
    pub signed_quantity: Decimal,
    /// Unit cost supplied by the caller.
    pub unit_cost: Decimal,
    /// Position quantity before the movement.
    pub balance_before: Decimal,
    /// Position quantity after the movement (never negative).
    pub balance_after: Decimal,
    /// Average cost the position carries after the movement.
    pub new_average_cost: Decimal,
}
