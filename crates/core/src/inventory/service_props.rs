//! Property-based tests for movement preparation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::costing::weighted_average_cost;
use super::error::InventoryError;
use super::service::MovementService;
use super::types::{MovementCategory, StockSnapshot, TransactionTypeInfo};

/// Strategy for positive decimal magnitudes with 4 fractional digits.
fn magnitude_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// Strategy for non-negative unit costs.
fn cost_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 4))
}

/// Strategy for any directional category.
fn category_strategy() -> impl Strategy<Value = MovementCategory> {
    prop_oneof![
        Just(MovementCategory::In),
        Just(MovementCategory::Out),
        Just(MovementCategory::AdjustmentIn),
        Just(MovementCategory::AdjustmentOut),
        Just(MovementCategory::TransferIn),
        Just(MovementCategory::TransferOut),
    ]
}

fn make_type(category: MovementCategory, affects_cost: bool) -> TransactionTypeInfo {
    TransactionTypeInfo {
        id: Uuid::new_v4(),
        category,
        affects_cost,
        is_active: true,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any sequence of accepted movements applied to a fresh position,
    /// the quantity equals the sum of all signed quantities applied so far
    /// and is never negative.
    #[test]
    fn prop_balance_is_running_sum_and_never_negative(
        steps in prop::collection::vec((category_strategy(), magnitude_strategy(), cost_strategy()), 1..20),
    ) {
        let mut stock = StockSnapshot::empty();
        let mut applied_sum = Decimal::ZERO;

        for (category, magnitude, cost) in steps {
            let type_info = make_type(category, category.is_inbound());
            match MovementService::prepare(&type_info, &stock, magnitude, cost) {
                Ok(prepared) => {
                    prop_assert_eq!(
                        prepared.balance_after,
                        prepared.balance_before + prepared.signed_quantity
                    );
                    applied_sum += prepared.signed_quantity;
                    stock = StockSnapshot {
                        quantity: prepared.balance_after,
                        average_cost: prepared.new_average_cost,
                    };
                }
                Err(InventoryError::InsufficientStock { available, .. }) => {
                    // Rejected movement changes nothing.
                    prop_assert_eq!(available, stock.quantity);
                }
                Err(e) => return Err(TestCaseError::fail(format!("unexpected error: {e}"))),
            }

            prop_assert!(stock.quantity >= Decimal::ZERO);
            prop_assert_eq!(stock.quantity, applied_sum);
        }
    }

    /// The weighted-average formula holds for every cost-affecting inbound
    /// movement, and collapses to the unit cost on an empty position.
    #[test]
    fn prop_weighted_average_formula(
        prior_qty in 0i64..1_000_000i64,
        prior_avg in cost_strategy(),
        incoming in magnitude_strategy(),
        unit_cost in cost_strategy(),
    ) {
        let prior_qty = Decimal::new(prior_qty, 4);
        let stock = StockSnapshot { quantity: prior_qty, average_cost: prior_avg };
        let purchase = make_type(MovementCategory::In, true);

        let prepared = MovementService::prepare(&purchase, &stock, incoming, unit_cost).unwrap();

        let expected = if prior_qty == Decimal::ZERO {
            unit_cost
        } else {
            (prior_qty * prior_avg + incoming * unit_cost) / (prior_qty + incoming)
        };
        prop_assert_eq!(prepared.new_average_cost, expected);
        prop_assert_eq!(
            prepared.new_average_cost,
            weighted_average_cost(prior_qty, prior_avg, incoming, unit_cost)
        );
    }

    /// Outbound and cost-neutral movements never change the average cost.
    #[test]
    fn prop_cost_unchanged_when_not_affecting(
        qty in magnitude_strategy(),
        avg in cost_strategy(),
        magnitude in magnitude_strategy(),
        cost in cost_strategy(),
    ) {
        prop_assume!(magnitude <= qty);
        let stock = StockSnapshot { quantity: qty, average_cost: avg };

        let sale = make_type(MovementCategory::Out, false);
        let prepared = MovementService::prepare(&sale, &stock, magnitude, cost).unwrap();
        prop_assert_eq!(prepared.new_average_cost, avg);

        let neutral_in = make_type(MovementCategory::In, false);
        let prepared = MovementService::prepare(&neutral_in, &stock, magnitude, cost).unwrap();
        prop_assert_eq!(prepared.new_average_cost, avg);
    }

    /// An outbound larger than the on-hand quantity is always rejected.
    #[test]
    fn prop_overdraw_always_rejected(
        qty in 0i64..1_000i64,
        excess in 1i64..1_000i64,
    ) {
        let quantity = Decimal::new(qty, 2);
        let magnitude = quantity + Decimal::new(excess, 2);
        let stock = StockSnapshot { quantity, average_cost: Decimal::ONE };
        let sale = make_type(MovementCategory::Out, false);

        let result = MovementService::prepare(&sale, &stock, magnitude, Decimal::ZERO);
        prop_assert!(
            matches!(result, Err(InventoryError::InsufficientStock { .. })),
            "expected InsufficientStock, got {:?}",
            result
        );
    }
}
