//! Property-based tests for cuadre derivation helpers.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::cuadre::{calculated_balance, channel_expense, channel_income};
use crate::entities::cuadres;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

#[allow(clippy::type_complexity)]
fn model_strategy() -> impl Strategy<Value = cuadres::Model> {
    (
        amount_strategy(),
        (amount_strategy(), amount_strategy(), amount_strategy()),
        (amount_strategy(), amount_strategy(), amount_strategy()),
        proptest::option::of(amount_strategy()),
    )
        .prop_map(|(opening, income, expense, physical)| {
            let now = Utc::now().into();
            cuadres::Model {
                id: Uuid::nil(),
                organization_id: Uuid::nil(),
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                opening_balance: opening,
                income_cash: income.0,
                income_transfer: income.1,
                income_card: income.2,
                expense_cash: expense.0,
                expense_transfer: expense.1,
                expense_card: expense.2,
                physical_balance: physical,
                observations: None,
                closed: false,
                created_by: None,
                closed_by: None,
                closed_at: None,
                created_at: now,
                updated_at: now,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The channel extractors read back exactly the stored columns.
    #[test]
    fn prop_channel_extraction_matches_columns(model in model_strategy()) {
        let income = channel_income(&model);
        prop_assert_eq!(income.cash, model.income_cash);
        prop_assert_eq!(income.transfer, model.income_transfer);
        prop_assert_eq!(income.card, model.income_card);

        let expense = channel_expense(&model);
        prop_assert_eq!(expense.cash, model.expense_cash);
        prop_assert_eq!(expense.transfer, model.expense_transfer);
        prop_assert_eq!(expense.card, model.expense_card);
    }

    /// calculated = opening + income - expense, derived from any stored
    /// record.
    #[test]
    fn prop_calculated_balance_identity(model in model_strategy()) {
        let expected = model.opening_balance
            + channel_income(&model).sum()
            - channel_expense(&model).sum();
        prop_assert_eq!(calculated_balance(&model), expected);
    }
}
