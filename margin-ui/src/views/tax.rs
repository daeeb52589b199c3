use std::fmt;

use margin_core::{DashboardState, ExpenseKind, format_kes};
use rust_decimal::Decimal;

pub fn render(
    out: &mut impl fmt::Write,
    state: &DashboardState,
    calculator_amount: Option<Decimal>,
) -> fmt::Result {
    let margin = state.margin();

    writeln!(out, "Tax Impact")?;
    writeln!(out, "Understand how non-eTIMS expenses hit your profit.")?;
    writeln!(out)?;
    writeln!(
        out,
        "Since June 2025, informal expenses without an eTIMS receipt are 100% non-deductible."
    )?;
    writeln!(out, "That means your taxable profit increases by the full amount.")?;
    writeln!(
        out,
        "For your duka, this adds a corporate tax penalty of {} on current informal expenses.",
        format_kes(margin.tax_penalty)
    )?;
    writeln!(out)?;

    writeln!(out, "Live Penalty Calculator")?;
    match calculator_amount
        .map(|amount| DashboardState::penalty_preview(amount, ExpenseKind::Informal))
        .filter(|penalty| *penalty > Decimal::ZERO)
    {
        Some(penalty) => writeln!(
            out,
            "Extra tax on this one informal cost: {}.",
            format_kes(penalty)
        )?,
        None => writeln!(
            out,
            "Enter a single informal expense (--penalty-preview) to see the extra tax you will pay."
        )?,
    }
    writeln!(out)?;

    writeln!(out, "eTIMS Readiness Score")?;
    writeln!(
        out,
        "Your current readiness is {}%. Move informal costs to eTIMS-compliant suppliers to lift this to 100%.",
        state.etims_readiness_display()
    )
}
