//! Common utility functions for tax calculations.
//!
//! Shared money-arithmetic helpers used across the calculation modules:
//! financial rounding, percentage application, and boundary clamping.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 round away from zero, per standard financial
/// convention.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a percentage rate to an amount. Rates throughout the engine are
/// percentages, e.g. `20` for 20%.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::pct_of;
///
/// assert_eq!(pct_of(dec!(500000), dec!(20)), dec!(100000));
/// ```
pub fn pct_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount * rate / dec!(100)
}

/// Clamps a monetary input to zero when negative.
///
/// Raw form inputs can arrive negative; the engine degrades gracefully at
/// the boundary instead of rejecting them.
pub fn clamp_non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
