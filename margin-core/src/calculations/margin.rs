//! Net-profit margin after Kenyan flat-rate levies.
//!
//! # Breakdown
//!
//! | Line                 | Formula                                               |
//! |----------------------|-------------------------------------------------------|
//! | VAT                  | gross sales × 16%                                     |
//! | Digital service tax  | gross sales × 1.5%                                    |
//! | Tax penalty          | informal expenses × 30% corporate rate                |
//! | Net profit           | gross sales − (VAT + DST + input costs + penalty)     |
//!
//! An expense without an eTIMS receipt is fully non-deductible, so its whole
//! value is taxed at the corporate rate as if it were profit. That extra tax
//! is the penalty line.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use margin_core::calculations::calculate_margin;
//! use margin_core::MarginInputs;
//!
//! let margin = calculate_margin(&MarginInputs {
//!     gross_sales: dec!(65000),
//!     input_costs: dec!(18500),
//!     non_compliant_expense_total: dec!(3500),
//! });
//!
//! assert_eq!(margin.vat, dec!(10400));
//! assert_eq!(margin.digital_service_tax, dec!(975));
//! assert_eq!(margin.tax_penalty, dec!(1050));
//! assert_eq!(margin.net_profit, dec!(34075));
//! ```

use rust_decimal::Decimal;

use crate::models::{KENYA_CORPORATE_TAX_RATE_2026, MarginBreakdown, MarginInputs, MarginRates};

/// Extra corporate tax owed because `expense_amount` is non-deductible.
///
/// Non-positive amounts carry no penalty.
pub fn calculate_non_compliant_expense_penalty(
    expense_amount: Decimal,
    corporate_rate: Decimal,
) -> Decimal {
    if expense_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    expense_amount * corporate_rate
}

/// [`calculate_non_compliant_expense_penalty`] at the 2026 corporate rate.
pub fn calculate_non_compliant_expense_penalty_at_default_rate(expense_amount: Decimal) -> Decimal {
    calculate_non_compliant_expense_penalty(expense_amount, KENYA_CORPORATE_TAX_RATE_2026)
}

/// Margin breakdown under the 2026 Kenyan rates.
pub fn calculate_margin(inputs: &MarginInputs) -> MarginBreakdown {
    calculate_margin_with_rates(inputs, &MarginRates::KENYA_2026)
}

/// Margin breakdown under an explicit rate set.
pub fn calculate_margin_with_rates(
    inputs: &MarginInputs,
    rates: &MarginRates,
) -> MarginBreakdown {
    let vat = inputs.gross_sales * rates.vat_rate;
    let digital_service_tax = inputs.gross_sales * rates.digital_service_tax_rate;
    let tax_penalty = calculate_non_compliant_expense_penalty(
        inputs.non_compliant_expense_total,
        rates.corporate_tax_rate,
    );

    let net_profit =
        inputs.gross_sales - (vat + digital_service_tax + inputs.input_costs + tax_penalty);

    MarginBreakdown {
        gross_sales: inputs.gross_sales,
        input_costs: inputs.input_costs,
        non_compliant_expense_total: inputs.non_compliant_expense_total,
        vat,
        digital_service_tax,
        tax_penalty,
        net_profit,
    }
}
