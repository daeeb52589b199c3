//! Core of the KRA-Ready duka dashboard: Kenyan tax arithmetic, the
//! dashboard session state, a simulated M-Pesa STK push and the theme
//! preference service.

pub mod calculations;
pub mod dashboard;
pub mod format;
pub mod ids;
pub mod models;
pub mod payments;
pub mod prefs;
pub mod route;

pub use calculations::*;
pub use dashboard::{DashboardState, ExpenseError, RECENT_EXPENSE_LIMIT, ReadinessLevel};
pub use format::format_kes;
pub use models::*;
pub use payments::{StkPushError, StkPushSimulator, StkPushState, SimulatorOptions};
pub use prefs::{PreferenceStore, StoreConfig, StoreError, StoreRegistry, ThemeService};
pub use route::Route;
