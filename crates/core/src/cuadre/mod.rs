//! Daily cash reconciliation (cuadre) logic.
//!
//! A cuadre compares the balance a till should hold (opening balance plus
//! income minus expenses, per payment channel) against the physically
//! counted cash, broken down by bill and coin denomination. Once closed, a
//! cuadre is immutable.

pub mod denominations;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use denominations::{BillCounts, CoinCounts, DenominationCounts};
pub use error::CuadreError;
pub use service::CuadreService;
pub use types::{ChannelTotals, ClosedBalances};
