use std::fmt;

use margin_core::{DashboardState, ExpenseKind, RECENT_EXPENSE_LIMIT, format_kes};

use super::amount_line;

pub fn render(
    out: &mut impl fmt::Write,
    state: &DashboardState,
) -> fmt::Result {
    let margin = state.margin();

    writeln!(out, "Real-time profit after KRA, VAT & eTIMS rules.")?;
    writeln!(out)?;
    writeln!(out, "Net Profit (After KRA)   {}", format_kes(margin.net_profit))?;
    writeln!(
        out,
        "eTIMS Readiness          {}% ({})",
        state.etims_readiness_display(),
        state.readiness_level().label()
    )?;
    amount_line(out, "Gross Sales", &format_kes(margin.gross_sales))?;
    amount_line(out, "Input Costs", &format!("-{}", format_kes(margin.input_costs)))?;
    amount_line(out, "VAT @16%", &format!("-{}", format_kes(margin.vat)))?;
    amount_line(
        out,
        "DST @1.5%",
        &format!("-{}", format_kes(margin.digital_service_tax)),
    )?;
    amount_line(
        out,
        "Tax Penalty (Non-eTIMS expenses)",
        &format!("-{}", format_kes(margin.tax_penalty)),
    )?;
    writeln!(out)?;

    status_card(out, "Gross Sales Today", &format_kes(state.gross_sales()), "Simulated Nairobi duka")?;
    status_card(out, "Total Expenses", &format_kes(state.input_costs()), "Stock, fuel, rent")?;
    status_card(
        out,
        "Non-eTIMS",
        &format_kes(state.non_compliant_expense_total()),
        "Fully non-deductible",
    )?;
    writeln!(out)?;

    writeln!(out, "Recent Transactions")?;
    let mut any = false;
    for expense in state.recent_expenses(RECENT_EXPENSE_LIMIT) {
        any = true;
        let marker = match expense.kind {
            ExpenseKind::Receipted => ' ',
            ExpenseKind::Informal => '!',
        };
        writeln!(out, "{marker} {:<34}{:>16}", expense.label, format_kes(expense.amount))?;
    }
    if !any {
        writeln!(out, "  No expenses logged yet.")?;
    }
    writeln!(out)?;
    writeln!(out, "Log more expenses under eTIMS Compliant to protect profit.")
}

fn status_card(
    out: &mut impl fmt::Write,
    label: &str,
    value: &str,
    trend: &str,
) -> fmt::Result {
    writeln!(out, "  {label:<20}{value:>14}   {trend}")
}
