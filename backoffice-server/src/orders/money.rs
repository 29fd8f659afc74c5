//! Money Arithmetic
//!
//! Prices are stored as REAL (f64); all arithmetic goes through
//! `rust_decimal` with 2-dp half-away-from-zero rounding so line totals
//! never accumulate binary float error. Two amounts within one cent are
//! considered equal.

use rust_decimal::prelude::*;

/// Comparison tolerance in euros
pub const MONEY_TOLERANCE: f64 = 0.01;

/// f64 euros to a 2-dp decimal
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Decimal back to f64 for storage
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Equality within one cent
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() <= to_decimal(MONEY_TOLERANCE)
}

/// Sum of quantity * unit_price across lines, rounded per line
pub fn lines_total(lines: impl Iterator<Item = (i64, f64)>) -> f64 {
    let total = lines.fold(Decimal::ZERO, |acc, (quantity, unit_price)| {
        acc + (Decimal::from(quantity) * to_decimal(unit_price))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    });
    to_f64(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(to_f64(to_decimal(10.005)), 10.01);
        assert_eq!(to_f64(to_decimal(-10.005)), -10.01);
    }

    #[test]
    fn tolerance_is_one_cent() {
        assert!(money_eq(10.00, 10.01));
        assert!(!money_eq(10.00, 10.02));
    }

    #[test]
    fn lines_total_avoids_float_drift() {
        // 3 * 0.1 in f64 is 0.30000000000000004
        let total = lines_total([(3, 0.1), (1, 0.2)].into_iter());
        assert_eq!(total, 0.5);
    }

    #[test]
    fn lines_total_of_empty_is_zero() {
        assert_eq!(lines_total(std::iter::empty()), 0.0);
    }
}
