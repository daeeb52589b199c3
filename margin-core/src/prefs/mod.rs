//! User preferences and the storage port behind them.

pub mod factory;
pub mod store;
pub mod theme;

pub use factory::{StoreConfig, StoreFactory, StoreRegistry};
pub use store::{PreferenceStore, StoreError};
pub use theme::{FixedAppearance, SystemAppearance, THEME_STORAGE_KEY, ThemeService};
