use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One band of a marginal-rate schedule.
///
/// `upper_limit` is the ceiling of the band; `None` marks the open-ended top
/// band. Schedules are ordered ascending by `upper_limit` and end with
/// exactly one unbounded band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub const fn bounded(
        upper_limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate,
        }
    }

    pub const fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.upper_limit.is_none()
    }
}

/// Approximate Kenyan PAYE brackets for 2026. Amounts are monthly, in KES.
pub const PAYE_BRACKETS_2026: [TaxBracket; 5] = [
    TaxBracket::bounded(dec!(24000), dec!(0.10)),
    TaxBracket::bounded(dec!(40667), dec!(0.25)),
    TaxBracket::bounded(dec!(57334), dec!(0.30)),
    TaxBracket::bounded(dec!(76999), dec!(0.325)),
    TaxBracket::unbounded(dec!(0.35)),
];
