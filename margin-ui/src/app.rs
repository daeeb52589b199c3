//! Wiring between configuration, storage backends and the core services.

use std::sync::Arc;

use anyhow::{Context, Result};
use margin_core::payments::{OutcomeSource, SeededSource, SystemClock, ThreadRngSource};
use margin_core::prefs::SystemAppearance;
use margin_core::{
    DashboardState, StkPushRequest, StkPushSimulator, StkPushState, StoreConfig, StoreRegistry,
    ThemeService,
};
use margin_store::register_builtin_backends;
use tracing::{debug, info};

use crate::appearance::DesktopAppearance;
use crate::config::{DashboardConfig, SimulatorConfig};
use crate::csv_loader;

/// Registry with every preference backend compiled into this binary.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    register_builtin_backends(&mut registry);
    registry
}

pub async fn open_theme_service(
    registry: &StoreRegistry,
    store: &StoreConfig,
    appearance: Arc<dyn SystemAppearance>,
) -> Result<ThemeService> {
    debug!(backend = %store.backend, "opening preference store");
    let store = registry
        .create(store)
        .await
        .with_context(|| format!("failed to open '{}' preference store", store.backend))?;
    Ok(ThemeService::load(store, appearance).await)
}

/// [`open_theme_service`] resolving `system` against the desktop.
pub async fn open_desktop_theme_service(
    registry: &StoreRegistry,
    store: &StoreConfig,
) -> Result<ThemeService> {
    open_theme_service(registry, store, Arc::new(DesktopAppearance)).await
}

/// Starting session: sample or empty, then the configured gross sales and
/// expense CSV on top.
pub fn build_dashboard(config: &DashboardConfig) -> Result<DashboardState> {
    let mut state = if config.sample_data {
        DashboardState::with_sample_data()
    } else {
        DashboardState::default()
    };

    if let Some(gross_sales) = config.gross_sales {
        state.set_gross_sales(gross_sales);
    }

    if let Some(path) = &config.expenses_csv {
        let rows = csv_loader::load_from_file(path)
            .with_context(|| format!("failed to load expenses from '{}'", path.display()))?;
        let count = state
            .replace_expenses(rows)
            .with_context(|| format!("invalid expense in '{}'", path.display()))?;
        info!(count, path = %path.display(), "expenses imported");
    }

    Ok(state)
}

/// Appends `label,amount[,kind]` entries one by one, as the expense form
/// does. Stops at the first entry the dashboard rejects; entries before it
/// stay logged.
pub fn log_expenses(
    state: &mut DashboardState,
    entries: &[String],
) -> Result<()> {
    for raw in entries {
        let entry = csv_loader::parse_entry(raw)?;
        let expense = state
            .add_expense(entry)
            .with_context(|| format!("cannot log expense '{raw}'"))?;
        info!(id = %expense.id, label = %expense.label, "expense logged");
    }
    Ok(())
}

pub fn build_simulator(config: &SimulatorConfig) -> Result<StkPushSimulator> {
    let options = config.options().context("invalid simulator settings")?;
    let outcome: Arc<dyn OutcomeSource> = match config.seed {
        Some(seed) => Arc::new(SeededSource::new(seed)),
        None => Arc::new(ThreadRngSource),
    };
    Ok(StkPushSimulator::with_sources(
        options,
        outcome,
        Arc::new(SystemClock),
    )?)
}

/// Initiates a push and waits until it settles.
///
/// `on_pending` sees the state once the push is in flight. The returned
/// state is terminal: either the validation failure or the simulated
/// outcome.
pub async fn run_quick_bill(
    simulator: &StkPushSimulator,
    request: StkPushRequest,
    on_pending: impl FnOnce(&StkPushState),
) -> Result<StkPushState> {
    let mut rx = simulator.subscribe();
    if simulator.initiate_stk_push(request).is_err() {
        return Ok(simulator.snapshot());
    }
    on_pending(&simulator.snapshot());

    let settled = rx
        .wait_for(|state| state.status.is_terminal())
        .await
        .context("simulator stopped before the push settled")?
        .clone();
    Ok(settled)
}
