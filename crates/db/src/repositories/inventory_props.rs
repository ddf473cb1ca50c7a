//! Property-based tests for ledger query helpers.

use std::collections::HashMap;

use chrono::{NaiveDate, Timelike, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::inventory::{day_bounds, low_stock_rows, valuation_rows};
use crate::entities::inventory_stock;

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn positions_strategy() -> impl Strategy<Value = Vec<inventory_stock::Model>> {
    proptest::collection::vec((quantity_strategy(), quantity_strategy()), 0..20).prop_map(
        |pairs| {
            let now = Utc::now().into();
            pairs
                .into_iter()
                .map(|(quantity, average_cost)| inventory_stock::Model {
                    id: Uuid::new_v4(),
                    organization_id: Uuid::nil(),
                    product_id: Uuid::new_v4(),
                    location_id: Uuid::new_v4(),
                    quantity,
                    reserved_quantity: Decimal::ZERO,
                    average_cost,
                    last_movement_at: None,
                    updated_at: now,
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A day window starts at midnight of its date and spans exactly one
    /// day, across month and year boundaries.
    #[test]
    fn prop_day_bounds_window(date in date_strategy()) {
        let (start, end) = day_bounds(date);
        prop_assert_eq!(start.date_naive(), date);
        prop_assert_eq!(start.num_seconds_from_midnight(), 0);
        prop_assert_eq!(end - start, chrono::Duration::days(1));
    }

    /// Valuation keeps exactly the held positions, prices each at its
    /// average cost, and orders them by value descending.
    #[test]
    fn prop_valuation_rows(positions in positions_strategy()) {
        let held = positions
            .iter()
            .filter(|p| p.quantity > Decimal::ZERO)
            .count();
        let expected_total: Decimal = positions
            .iter()
            .filter(|p| p.quantity > Decimal::ZERO)
            .map(|p| p.quantity * p.average_cost)
            .sum();

        let rows = valuation_rows(positions);
        prop_assert_eq!(rows.len(), held);
        let total: Decimal = rows.iter().map(|r| r.total_value).sum();
        prop_assert_eq!(total, expected_total);
        for pair in rows.windows(2) {
            prop_assert!(pair[0].total_value >= pair[1].total_value);
        }
        for row in &rows {
            prop_assert_eq!(row.total_value, row.stock.quantity * row.stock.average_cost);
        }
    }

    /// The low-stock report keeps exactly the positions at or below their
    /// product's threshold, ordered by quantity ascending.
    #[test]
    fn prop_low_stock_rows(
        positions in positions_strategy(),
        threshold in quantity_strategy(),
    ) {
        let thresholds: HashMap<Uuid, Decimal> = positions
            .iter()
            .map(|p| (p.product_id, threshold))
            .collect();
        let expected = positions
            .iter()
            .filter(|p| p.quantity <= threshold)
            .count();

        let rows = low_stock_rows(positions, &thresholds);
        prop_assert_eq!(rows.len(), expected);
        for row in &rows {
            prop_assert!(row.stock.quantity <= row.min_stock);
        }
        for pair in rows.windows(2) {
            prop_assert!(pair[0].stock.quantity <= pair[1].stock.quantity);
        }
    }
}
