//! Application configuration.
//!
//! Settings come from an optional TOML file; command-line flags are layered
//! on top by the binary. Every section and key is optional.
//!
//! ```toml
//! [store]
//! backend = "sqlite"
//! connection_string = "kra-ready.db"
//!
//! [simulator]
//! delay_ms = 3200
//! failure_rate = 0.1
//!
//! [dashboard]
//! gross_sales = 65000
//! sample_data = true
//!
//! [logging]
//! level = "info"
//! file = "kra-ready.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use margin_core::StoreConfig;
use margin_core::payments::{
    DEFAULT_FAILURE_RATE, DEFAULT_SIMULATED_DELAY, SimulatorOptions, SimulatorOptionsError,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Simulator(#[from] SimulatorOptionsError),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub delay_ms: u64,
    pub failure_rate: f64,
    /// Fixes the outcome sequence for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_SIMULATED_DELAY.as_millis() as u64,
            failure_rate: DEFAULT_FAILURE_RATE,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn options(&self) -> Result<SimulatorOptions, SimulatorOptionsError> {
        let options = SimulatorOptions {
            simulated_delay: Duration::from_millis(self.delay_ms),
            failure_rate: self.failure_rate,
        };
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Overrides the starting gross sales figure.
    pub gross_sales: Option<Decimal>,
    /// Start from the two sample expenses rather than an empty list.
    pub sample_data: bool,
    /// Expense CSV to load in place of the sample list.
    pub expenses_csv: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            gross_sales: None,
            sample_data: true,
            expenses_csv: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            console: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub simulator: SimulatorConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(
        input: &str,
        origin: &Path,
    ) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.simulator.options()?;
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }
}
