//! Common utility functions for margin calculations.
//!
//! Calculations keep full precision; the helpers here are applied only when
//! figures are prepared for display.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rounds a value to the nearest whole shilling.
///
/// Halves round toward positive infinity, so `0.5` becomes `1` and `-0.5`
/// becomes `0`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use margin_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(dec!(1234.4)), dec!(1234));
/// assert_eq!(round_to_unit(dec!(1234.5)), dec!(1235));
/// assert_eq!(round_to_unit(dec!(-1234.5)), dec!(-1234));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    (value + dec!(0.5)).floor()
}

/// Share of `part` in `whole` as a percentage.
///
/// Returns `None` when `whole` is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use margin_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(1), dec!(4)), Some(dec!(25)));
/// assert_eq!(percent_of(dec!(1), dec!(0)), None);
/// ```
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    Some(part / whole * Decimal::ONE_HUNDRED)
}
