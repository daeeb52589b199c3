//! Plain-text renderings of the dashboard screens.
//!
//! Every view writes into any [`fmt::Write`] so the binary can print to
//! stdout and tests can render into a `String`.

pub mod account;
pub mod expenses;
pub mod home;
pub mod quick_bill;
pub mod settings;
pub mod tax;

use std::fmt;

use clap::ValueEnum;
use margin_core::{Appearance, DashboardState, ThemeMode};
use rust_decimal::Decimal;

/// Bottom-navigation tabs of the dashboard route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Tab {
    #[default]
    Home,
    Expenses,
    Tax,
    Settings,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Expenses => "Expenses",
            Self::Tax => "Tax",
            Self::Settings => "Settings",
        }
    }
}

/// Everything a dashboard screen needs besides the session itself.
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    pub state: &'a DashboardState,
    pub tab: Tab,
    pub theme: ThemeMode,
    pub appearance: Appearance,
    /// Amount typed into the live penalty calculator, if any.
    pub penalty_preview: Option<Decimal>,
}

pub fn render_dashboard(
    out: &mut impl fmt::Write,
    view: &DashboardView<'_>,
) -> fmt::Result {
    render_nav(out, view.tab)?;
    writeln!(out)?;
    match view.tab {
        Tab::Home => home::render(out, view.state),
        Tab::Expenses => expenses::render(out, view.state, view.penalty_preview),
        Tab::Tax => tax::render(out, view.state, view.penalty_preview),
        Tab::Settings => settings::render(out, view.state, view.theme, view.appearance),
    }
}

fn render_nav(
    out: &mut impl fmt::Write,
    active: Tab,
) -> fmt::Result {
    let items: Vec<String> = [Tab::Home, Tab::Expenses, Tab::Tax, Tab::Settings]
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.title())
            } else {
                tab.title().to_string()
            }
        })
        .collect();
    writeln!(out, "KRA-Ready  |  {}", items.join("  "))
}

/// Two-column line with the amount right-aligned.
pub(crate) fn amount_line(
    out: &mut impl fmt::Write,
    label: &str,
    amount: &str,
) -> fmt::Result {
    writeln!(out, "  {label:<34}{amount:>16}")
}
