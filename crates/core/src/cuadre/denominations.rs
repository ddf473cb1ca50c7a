//! Cash denomination counting.
//!
//! Totals use exact decimal arithmetic; a till count must never drift at
//! the cent level.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bill counts by face value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillCounts {
    /// Number of 100 bills.
    #[serde(default)]
    pub hundreds: u32,
    /// Number of 50 bills.
    #[serde(default)]
    pub fifties: u32,
    /// Number of 20 bills.
    #[serde(default)]
    pub twenties: u32,
    /// Number of 10 bills.
    #[serde(default)]
    pub tens: u32,
    /// Number of 5 bills.
    #[serde(default)]
    pub fives: u32,
    /// Number of 2 bills.
    #[serde(default)]
    pub twos: u32,
    /// Number of 1 bills.
    #[serde(default)]
    pub ones: u32,
}

impl BillCounts {
    /// Total face value of the counted bills.
    #[must_use]
    pub fn total(&self) -> Decimal {
        Decimal::from(self.hundreds) * Decimal::from(100u32)
            + Decimal::from(self.fifties) * Decimal::from(50u32)
            + Decimal::from(self.twenties) * Decimal::from(20u32)
            + Decimal::from(self.tens) * Decimal::from(10u32)
            + Decimal::from(self.fives) * Decimal::from(5u32)
            + Decimal::from(self.twos) * Decimal::from(2u32)
            + Decimal::from(self.ones)
    }
}

/// Coin counts by face value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinCounts {
    /// Number of 1.00 coins.
    #[serde(default)]
    pub dollars: u32,
    /// Number of 0.50 coins.
    #[serde(default)]
    pub half_dollars: u32,
    /// Number of 0.25 coins.
    #[serde(default)]
    pub quarters: u32,
    /// Number of 0.10 coins.
    #[serde(default)]
    pub dimes: u32,
    /// Number of 0.05 coins.
    #[serde(default)]
    pub nickels: u32,
    /// Number of 0.01 coins.
    #[serde(default)]
    pub pennies: u32,
}

impl CoinCounts {
    /// Total face value of the counted coins.
    #[must_use]
    pub fn total(&self) -> Decimal {
        Decimal::from(self.dollars)
            + Decimal::from(self.half_dollars) * Decimal::new(50, 2)
            + Decimal::from(self.quarters) * Decimal::new(25, 2)
            + Decimal::from(self.dimes) * Decimal::new(10, 2)
            + Decimal::from(self.nickels) * Decimal::new(5, 2)
            + Decimal::from(self.pennies) * Decimal::new(1, 2)
    }
}

/// Full denomination breakdown of a till count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationCounts {
    /// Counted bills.
    #[serde(default)]
    pub bills: BillCounts,
    /// Counted coins.
    #[serde(default)]
    pub coins: CoinCounts,
}

impl DenominationCounts {
    /// Total counted cash: bills plus coins.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.bills.total() + self.coins.total()
    }
}
