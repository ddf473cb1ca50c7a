//! Cuadre domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amounts split by payment channel.
///
/// Used for both the income and expense sides of a cuadre.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTotals {
    /// Physical cash.
    #[serde(default)]
    pub cash: Decimal,
    /// Bank transfers.
    #[serde(default)]
    pub transfer: Decimal,
    /// Card payments.
    #[serde(default)]
    pub card: Decimal,
}

impl ChannelTotals {
    /// Sum across all channels.
    #[must_use]
    pub fn sum(&self) -> Decimal {
        self.cash + self.transfer + self.card
    }
}

/// Balances carried by the most recent closed cuadre.
///
/// Used to derive the opening balance of the next day's cuadre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedBalances {
    /// Physically counted balance, when a count was recorded.
    pub physical: Option<Decimal>,
    /// Balance derived from opening plus income minus expenses.
    pub calculated: Decimal,
}
