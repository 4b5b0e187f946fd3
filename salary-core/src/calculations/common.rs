//! Rounding and comparison helpers shared by the IRPS, INSS and salary
//! calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to whole centavos, half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(3450.004)), dec!(3450.00));
/// assert_eq!(round_half_up(dec!(3450.005)), dec!(3450.01));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    round_to(value, 2)
}

/// Rounds to `dp` decimal places, half away from zero.
pub fn round_to(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two amounts.
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use salary_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-1000.00), Decimal::ZERO), Decimal::ZERO);
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// True when `a` and `b` differ by strictly less than `tolerance`.
pub fn within_tolerance(
    a: Decimal,
    b: Decimal,
    tolerance: Decimal,
) -> bool {
    (a - b).abs() < tolerance
}
