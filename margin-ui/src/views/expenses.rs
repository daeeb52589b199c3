use std::fmt;

use margin_core::{DashboardState, ExpenseKind, format_kes};
use rust_decimal::Decimal;

pub fn render(
    out: &mut impl fmt::Write,
    state: &DashboardState,
    pending_informal: Option<Decimal>,
) -> fmt::Result {
    writeln!(out, "Expense Logger")?;
    writeln!(out, "Tag each cost as eTIMS Compliant or Informal.")?;
    writeln!(out)?;

    if let Some(amount) = pending_informal {
        let penalty = DashboardState::penalty_preview(amount, ExpenseKind::Informal);
        if penalty > Decimal::ZERO {
            writeln!(
                out,
                "This informal expense will add {} in extra corporate tax because it is 100% non-deductible in 2026.",
                format_kes(penalty)
            )?;
            writeln!(out)?;
        }
    }

    writeln!(
        out,
        "All Expenses   eTIMS: {} · Informal: {}",
        state.count_by_kind(ExpenseKind::Receipted),
        state.count_by_kind(ExpenseKind::Informal)
    )?;
    for expense in state.expenses() {
        writeln!(out, "  {:<34}{:>16}", expense.label, format_kes(expense.amount))?;
        writeln!(out, "    {}", expense.kind.deductibility())?;
    }
    Ok(())
}
