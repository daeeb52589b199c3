use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Figures the dashboard feeds into the margin calculation.
///
/// `input_costs` covers every expense; `non_compliant_expense_total` is the
/// informal subset, so `input_costs >= non_compliant_expense_total >= 0`
/// whenever both come from a [`crate::DashboardState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarginInputs {
    pub gross_sales: Decimal,
    pub input_costs: Decimal,
    pub non_compliant_expense_total: Decimal,
}

/// Decomposition of gross sales into levies, costs, penalty and profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginBreakdown {
    pub gross_sales: Decimal,
    pub input_costs: Decimal,
    pub non_compliant_expense_total: Decimal,
    pub vat: Decimal,
    pub digital_service_tax: Decimal,
    pub tax_penalty: Decimal,
    pub net_profit: Decimal,
}

impl MarginBreakdown {
    pub fn inputs(&self) -> MarginInputs {
        MarginInputs {
            gross_sales: self.gross_sales,
            input_costs: self.input_costs,
            non_compliant_expense_total: self.non_compliant_expense_total,
        }
    }

    /// Everything subtracted from gross sales to reach net profit.
    pub fn total_outgoings(&self) -> Decimal {
        self.vat + self.digital_service_tax + self.input_costs + self.tax_penalty
    }
}
