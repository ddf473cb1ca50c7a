//! Property-based tests for cuadre calculations.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::denominations::{BillCounts, CoinCounts, DenominationCounts};
use super::service::CuadreService;
use super::types::{ChannelTotals, ClosedBalances};

fn counts_strategy() -> impl Strategy<Value = DenominationCounts> {
    (
        (0u32..500, 0u32..500, 0u32..500, 0u32..500, 0u32..500, 0u32..500, 0u32..500),
        (0u32..500, 0u32..500, 0u32..500, 0u32..500, 0u32..500, 0u32..500),
    )
        .prop_map(|(b, c)| DenominationCounts {
            bills: BillCounts {
                hundreds: b.0,
                fifties: b.1,
                twenties: b.2,
                tens: b.3,
                fives: b.4,
                twos: b.5,
                ones: b.6,
            },
            coins: CoinCounts {
                dollars: c.0,
                half_dollars: c.1,
                quarters: c.2,
                dimes: c.3,
                nickels: c.4,
                pennies: c.5,
            },
        })
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The denomination total is additive across bill and coin components
    /// and equals the hand-computed sum of count times face value.
    #[test]
    fn prop_denomination_total_exact(counts in counts_strategy()) {
        let expected = Decimal::from(counts.bills.hundreds) * Decimal::from(100u32)
            + Decimal::from(counts.bills.fifties) * Decimal::from(50u32)
            + Decimal::from(counts.bills.twenties) * Decimal::from(20u32)
            + Decimal::from(counts.bills.tens) * Decimal::from(10u32)
            + Decimal::from(counts.bills.fives) * Decimal::from(5u32)
            + Decimal::from(counts.bills.twos) * Decimal::from(2u32)
            + Decimal::from(counts.bills.ones)
            + Decimal::from(counts.coins.dollars)
            + Decimal::from(counts.coins.half_dollars) * Decimal::new(50, 2)
            + Decimal::from(counts.coins.quarters) * Decimal::new(25, 2)
            + Decimal::from(counts.coins.dimes) * Decimal::new(10, 2)
            + Decimal::from(counts.coins.nickels) * Decimal::new(5, 2)
            + Decimal::from(counts.coins.pennies) * Decimal::new(1, 2);

        prop_assert_eq!(counts.total(), expected);
        prop_assert_eq!(counts.total(), counts.bills.total() + counts.coins.total());
        prop_assert!(counts.total() >= Decimal::ZERO);
    }

    /// calculated = opening + income - expense, and difference = physical -
    /// calculated, for any amounts.
    #[test]
    fn prop_balance_identities(
        opening in amount_strategy(),
        income_cash in amount_strategy(),
        income_transfer in amount_strategy(),
        income_card in amount_strategy(),
        expense_cash in amount_strategy(),
        expense_transfer in amount_strategy(),
        expense_card in amount_strategy(),
        physical in amount_strategy(),
    ) {
        let income = ChannelTotals { cash: income_cash, transfer: income_transfer, card: income_card };
        let expense = ChannelTotals { cash: expense_cash, transfer: expense_transfer, card: expense_card };

        let calculated = CuadreService::calculated_balance(opening, &income, &expense);
        prop_assert_eq!(calculated, opening + income.sum() - expense.sum());

        let difference = CuadreService::difference(Some(physical), calculated).unwrap();
        prop_assert_eq!(difference, physical - calculated);
    }

    /// Carry-forward always prefers the physical count when present.
    #[test]
    fn prop_opening_balance_prefers_physical(
        physical in amount_strategy(),
        calculated in amount_strategy(),
    ) {
        let with_physical = ClosedBalances { physical: Some(physical), calculated };
        prop_assert_eq!(CuadreService::opening_balance(Some(with_physical)), physical);

        let without_physical = ClosedBalances { physical: None, calculated };
        prop_assert_eq!(CuadreService::opening_balance(Some(without_physical)), calculated);
    }

    /// A closed cuadre rejects every modification and deletion.
    #[test]
    fn prop_closed_rejects_everything(_dummy in 0..100i32) {
        prop_assert!(CuadreService::validate_can_modify(true).is_err());
        prop_assert!(CuadreService::validate_can_delete(true).is_err());
        prop_assert!(CuadreService::validate_can_modify(false).is_ok());
        prop_assert!(CuadreService::validate_can_delete(false).is_ok());
    }
}
