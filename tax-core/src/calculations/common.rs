//! Shared arithmetic helpers for the tax calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to one decimal place using half-up rounding.
///
/// Values exactly at the midpoint are rounded away from zero, so `0.05`
/// becomes `0.1` and `-0.05` becomes `-0.1`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_one_dp;
///
/// assert_eq!(round_one_dp(dec!(4000.04)), dec!(4000.0));
/// assert_eq!(round_one_dp(dec!(4000.05)), dec!(4000.1));
/// assert_eq!(round_one_dp(dec!(-12.25)), dec!(-12.3)); // Away from zero
/// ```
pub fn round_one_dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the smaller of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::min;
///
/// assert_eq!(min(dec!(440000), dec!(500000)), dec!(440000));
/// assert_eq!(min(dec!(-1), dec!(0)), dec!(-1));
/// ```
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}
