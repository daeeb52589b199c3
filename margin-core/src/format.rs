//! Kenyan Shilling display formatting.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::calculations::common::round_to_unit;

/// Formats `amount` as whole shillings with comma grouping, e.g.
/// `KES 1,235`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use margin_core::format_kes;
///
/// assert_eq!(format_kes(dec!(1234.6)), "KES 1,235");
/// ```
pub fn format_kes(amount: Decimal) -> String {
    let whole = round_to_unit(amount).to_i128().unwrap_or_default();
    format!("KES {}", group_thousands(whole))
}

fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
