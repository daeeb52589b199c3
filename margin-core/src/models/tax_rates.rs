use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const KENYA_CORPORATE_TAX_RATE_2026: Decimal = dec!(0.30);
pub const KENYA_VAT_RATE_2026: Decimal = dec!(0.16);
pub const KENYA_DIGITAL_SERVICE_TAX_RATE_2026: Decimal = dec!(0.015);

/// Flat-rate levies applied by the margin calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginRates {
    pub vat_rate: Decimal,
    pub digital_service_tax_rate: Decimal,
    /// Rate charged on the full value of expenses without an eTIMS receipt.
    pub corporate_tax_rate: Decimal,
}

impl MarginRates {
    pub const KENYA_2026: Self = Self {
        vat_rate: KENYA_VAT_RATE_2026,
        digital_service_tax_rate: KENYA_DIGITAL_SERVICE_TAX_RATE_2026,
        corporate_tax_rate: KENYA_CORPORATE_TAX_RATE_2026,
    };
}

impl Default for MarginRates {
    fn default() -> Self {
        Self::KENYA_2026
    }
}
