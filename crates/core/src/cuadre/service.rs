//! Cuadre reconciliation service.
//!
//! Pure calculations and state rules; persistence and uniqueness are the
//! repository's concern.

use rust_decimal::Decimal;

use super::denominations::DenominationCounts;
use super::error::CuadreError;
use super::types::{ChannelTotals, ClosedBalances};

/// Cuadre calculation and validation service.
pub struct CuadreService;

impl CuadreService {
    /// Computes the physically counted balance from a denomination breakdown.
    #[must_use]
    pub fn physical_balance(counts: &DenominationCounts) -> Decimal {
        counts.total()
    }

    /// Derives the expected balance: opening plus income minus expenses.
    ///
    /// Computed by the application at read time; never stored.
    #[must_use]
    pub fn calculated_balance(
        opening_balance: Decimal,
        income: &ChannelTotals,
        expense: &ChannelTotals,
    ) -> Decimal {
        opening_balance + income.sum() - expense.sum()
    }

    /// Over/short signal: physical minus calculated, when a count exists.
    #[must_use]
    pub fn difference(physical: Option<Decimal>, calculated: Decimal) -> Option<Decimal> {
        physical.map(|p| p - calculated)
    }

    /// Opening balance carried forward from the most recent closed cuadre.
    ///
    /// Prefers the physical count over the calculated balance; zero when no
    /// closed cuadre exists yet.
    #[must_use]
    pub fn opening_balance(last_closed: Option<ClosedBalances>) -> Decimal {
        last_closed.map_or(Decimal::ZERO, |b| b.physical.unwrap_or(b.calculated))
    }

    /// Checks that the client-reported counted total matches the server
    /// computation from the denomination breakdown.
    ///
    /// # Errors
    ///
    /// Returns `CountMismatch` when they disagree.
    pub fn verify_reported_total(
        counts: &DenominationCounts,
        reported: Decimal,
    ) -> Result<Decimal, CuadreError> {
        let computed = counts.total();
        if computed != reported {
            return Err(CuadreError::CountMismatch { reported, computed });
        }
        Ok(computed)
    }

    /// Validates amounts supplied when creating or updating a cuadre.
    ///
    /// # Errors
    ///
    /// Returns an error on any negative amount.
    pub fn validate_amounts(
        opening_balance: Decimal,
        income: &ChannelTotals,
        expense: &ChannelTotals,
    ) -> Result<(), CuadreError> {
        if opening_balance < Decimal::ZERO {
            return Err(CuadreError::NegativeOpeningBalance);
        }
        for amount in [
            income.cash,
            income.transfer,
            income.card,
            expense.cash,
            expense.transfer,
            expense.card,
        ] {
            if amount < Decimal::ZERO {
                return Err(CuadreError::NegativeChannelAmount);
            }
        }
        Ok(())
    }

    /// Validates that a cuadre can still be updated.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` once the record is closed; closed is terminal.
    pub fn validate_can_modify(closed: bool) -> Result<(), CuadreError> {
        if closed {
            return Err(CuadreError::AlreadyClosed);
        }
        Ok(())
    }

    /// Validates that a cuadre can be deleted. Only open cuadres may go.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed` for closed records.
    pub fn validate_can_delete(closed: bool) -> Result<(), CuadreError> {
        if closed {
            return Err(CuadreError::AlreadyClosed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cuadre::denominations::{BillCounts, CoinCounts};
    use rust_decimal_macros::dec;

    #[test]
    fn test_calculated_balance() {
        let income = ChannelTotals {
            cash: dec!(500),
            transfer: dec!(200),
            card: dec!(100),
        };
        let expense = ChannelTotals {
            cash: dec!(150),
            transfer: dec!(50),
            card: dec!(0),
        };
        assert_eq!(
            CuadreService::calculated_balance(dec!(1000), &income, &expense),
            dec!(1600)
        );
    }

    #[test]
    fn test_difference_requires_physical_count() {
        assert_eq!(CuadreService::difference(None, dec!(100)), None);
        assert_eq!(
            CuadreService::difference(Some(dec!(95.50)), dec!(100)),
            Some(dec!(-4.50))
        );
    }

    #[test]
    fn test_opening_balance_prefers_physical() {
        let balances = ClosedBalances {
            physical: Some(dec!(205)),
            calculated: dec!(210),
        };
        assert_eq!(CuadreService::opening_balance(Some(balances)), dec!(205));
    }

    #[test]
    fn test_opening_balance_falls_back_to_calculated() {
        let balances = ClosedBalances {
            physical: None,
            calculated: dec!(210),
        };
        assert_eq!(CuadreService::opening_balance(Some(balances)), dec!(210));
    }

    #[test]
    fn test_opening_balance_zero_without_history() {
        assert_eq!(CuadreService::opening_balance(None), Decimal::ZERO);
    }

    #[test]
    fn test_verify_reported_total() {
        let counts = DenominationCounts {
            bills: BillCounts {
                twenties: 10,
                ..BillCounts::default()
            },
            coins: CoinCounts {
                dollars: 5,
                ..CoinCounts::default()
            },
        };
        assert_eq!(
            CuadreService::verify_reported_total(&counts, dec!(205)),
            Ok(dec!(205))
        );
        assert_eq!(
            CuadreService::verify_reported_total(&counts, dec!(204)),
            Err(CuadreError::CountMismatch {
                reported: dec!(204),
                computed: dec!(205),
            })
        );
    }

    #[test]
    fn test_validate_amounts() {
        let zero = ChannelTotals::default();
        assert!(CuadreService::validate_amounts(dec!(0), &zero, &zero).is_ok());
        assert_eq!(
            CuadreService::validate_amounts(dec!(-1), &zero, &zero),
            Err(CuadreError::NegativeOpeningBalance)
        );

        let bad = ChannelTotals {
            cash: dec!(-5),
            ..ChannelTotals::default()
        };
        assert_eq!(
            CuadreService::validate_amounts(dec!(0), &bad, &zero),
            Err(CuadreError::NegativeChannelAmount)
        );
    }

    #[test]
    fn test_closed_is_terminal() {
        assert!(CuadreService::validate_can_modify(false).is_ok());
        assert_eq!(
            CuadreService::validate_can_modify(true),
            Err(CuadreError::AlreadyClosed)
        );
        assert!(CuadreService::validate_can_delete(false).is_ok());
        assert_eq!(
            CuadreService::validate_can_delete(true),
            Err(CuadreError::AlreadyClosed)
        );
    }

    #[test]
    fn test_counted_day_reconciliation() {
        // Opening 1000, bills {20:10}=200, coins {1.00:5}=5 -> physical 205.
        let counts = DenominationCounts {
            bills: BillCounts {
                twenties: 10,
                ..BillCounts::default()
            },
            coins: CoinCounts {
                dollars: 5,
                ..CoinCounts::default()
            },
        };
        let physical = CuadreService::physical_balance(&counts);
        assert_eq!(physical, dec!(205));

        let zero = ChannelTotals::default();
        let calculated = CuadreService::calculated_balance(dec!(1000), &zero, &zero);
        assert_eq!(
            CuadreService::difference(Some(physical), calculated),
            Some(dec!(205) - dec!(1000))
        );
    }
}
