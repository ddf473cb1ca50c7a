//! Weighted-average cost calculation.

use rust_decimal::Decimal;

/// Recalculates the weighted-average unit cost after an inbound movement.
///
/// `new_avg = (prior_qty * prior_avg + incoming_qty * unit_cost) / (prior_qty + incoming_qty)`
///
/// When the prior quantity is zero (or the combined quantity would not be
/// positive) the result is the incoming unit cost.
#[must_use]
pub fn weighted_average_cost(
    prior_quantity: Decimal,
    prior_average_cost: Decimal,
    incoming_quantity: Decimal,
    unit_cost: Decimal,
) -> Decimal {
    let total_quantity = prior_quantity + incoming_quantity;
    if prior_quantity <= Decimal::ZERO || total_quantity <= Decimal::ZERO {
        return unit_cost;
    }

    let total_cost = prior_quantity * prior_average_cost + incoming_quantity * unit_cost;
    total_cost / total_quantity
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_prior_quantity_uses_unit_cost() {
        let avg = weighted_average_cost(dec!(0), dec!(0), dec!(100), dec!(5.00));
        assert_eq!(avg, dec!(5.00));
    }

    #[test]
    fn test_equal_quantities_average_costs() {
        let avg = weighted_average_cost(dec!(10), dec!(4.00), dec!(10), dec!(6.00));
        assert_eq!(avg, dec!(5.00));
    }

    #[test]
    fn test_weighted_toward_larger_lot() {
        // 30 @ 2.00 + 10 @ 6.00 = 120 / 40 = 3.00
        let avg = weighted_average_cost(dec!(30), dec!(2.00), dec!(10), dec!(6.00));
        assert_eq!(avg, dec!(3.00));
    }

    #[test]
    fn test_fractional_quantities() {
        // 1.5 @ 2.00 + 0.5 @ 4.00 = 5.00 / 2.0 = 2.50
        let avg = weighted_average_cost(dec!(1.5), dec!(2.00), dec!(0.5), dec!(4.00));
        assert_eq!(avg, dec!(2.50));
    }

    #[test]
    fn test_same_cost_is_stable() {
        let avg = weighted_average_cost(dec!(80), dec!(3.25), dec!(20), dec!(3.25));
        assert_eq!(avg, dec!(3.25));
    }
}
