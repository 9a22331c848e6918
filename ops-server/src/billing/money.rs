//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done with `Decimal` internally, then
//! converted back to `f64` (2 decimal places, half-up) for
//! storage/serialization.

use rust_decimal::prelude::*;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Net amount rule: gross + tax - discount
pub fn net_amount(gross: f64, tax: f64, discount: f64) -> f64 {
    to_f64(to_decimal(gross) + to_decimal(tax) - to_decimal(discount))
}

/// Sum a sequence of amounts with Decimal precision
pub fn sum(values: impl IntoIterator<Item = f64>) -> f64 {
    to_f64(values.into_iter().map(to_decimal).sum::<Decimal>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_amount_rule() {
        assert_eq!(net_amount(1000.0, 210.0, 50.0), 1160.0);
        assert_eq!(net_amount(0.0, 0.0, 0.0), 0.0);
        // discount can exceed gross; rule stays arithmetic
        assert_eq!(net_amount(100.0, 0.0, 150.0), -50.0);
    }

    #[test]
    fn test_net_amount_avoids_float_drift() {
        // 0.1 + 0.2 classic
        assert_eq!(net_amount(0.1, 0.2, 0.0), 0.3);
        assert_eq!(net_amount(1099.99, 0.01, 0.0), 1100.0);
    }

    #[test]
    fn test_sum_rounds_to_cents() {
        assert_eq!(sum([0.1, 0.2, 0.3]), 0.6);
        assert_eq!(sum([1000.555]), 1000.56);
        assert_eq!(sum(std::iter::empty::<f64>()), 0.0);
    }
}
