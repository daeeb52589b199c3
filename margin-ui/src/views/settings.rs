use std::fmt;

use margin_core::{Appearance, DashboardState, ThemeMode, format_kes};

pub fn render(
    out: &mut impl fmt::Write,
    state: &DashboardState,
    theme: ThemeMode,
    appearance: Appearance,
) -> fmt::Result {
    writeln!(out, "Settings")?;
    writeln!(out, "Basic configuration for your KRA-Ready workspace.")?;
    writeln!(out)?;
    writeln!(out, "Daily Gross Sales   {}", format_kes(state.gross_sales()))?;
    writeln!(
        out,
        "Adjust this to match a typical day for your shop (--gross-sales). All profit calculations update automatically."
    )?;
    writeln!(out)?;
    if theme == ThemeMode::System {
        writeln!(out, "Theme               system (currently {appearance})")?;
    } else {
        writeln!(out, "Theme               {theme}")?;
    }
    writeln!(out, "Next toggle         {}", theme.next())?;
    writeln!(out)?;
    writeln!(out, "About")?;
    writeln!(
        out,
        "KRA-Ready Margin Analyzer focuses on mobile-money, data-light workflows that feel native on Kenyan Android devices."
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn render_theme(theme: ThemeMode) -> String {
        let mut out = String::new();
        render(&mut out, &DashboardState::new(dec!(1234.6)), theme, Appearance::Light).unwrap();
        out
    }

    #[test]
    fn shows_rounded_gross_sales() {
        assert!(render_theme(ThemeMode::Dark).contains("Daily Gross Sales   KES 1,235"));
    }

    #[test]
    fn system_theme_shows_resolved_appearance() {
        let out = render_theme(ThemeMode::System);
        assert!(out.contains("system (currently light)"));
        assert!(out.contains("Next toggle         dark"));
    }

    #[test]
    fn explicit_theme_shows_next_in_cycle() {
        let out = render_theme(ThemeMode::Dark);
        assert!(out.contains("Theme               dark"));
        assert!(out.contains("Next toggle         light"));
    }
}
