//! # widgets-config
//!
//! Layered configuration loading for the widget manager using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`WIDGETS_*` prefix, `__` as separator)
//! 2. Project-level `.widgets/config.toml`
//! 3. User-level `~/.config/widgets/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `WIDGETS_VALIDATION__STRICT_DATA` -> `validation.strict_data`,
//! `WIDGETS_MANAGER__DEFAULT_SCHEMA` -> `manager.default_schema`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use widgets_config::WidgetsConfig;
//!
//! let config = WidgetsConfig::load().expect("config");
//! if config.validation.strict_data {
//!     println!("data is checked against widgetProps");
//! }
//! ```

mod error;
mod manager;
mod validation;

pub use error::ConfigError;
pub use manager::ManagerConfig;
pub use validation::ValidationConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "WIDGETS_";

/// Project file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".widgets/config.toml";

/// Settings for a widget manager: how payloads are validated and which
/// schema `load` uses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WidgetsConfig {
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub manager: ManagerConfig,
}

impl WidgetsConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`WidgetsConfig::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value has
    /// the wrong type, and `ConfigError::InvalidValue` if `validation.data_var`
    /// is empty.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`WidgetsConfig::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and check a configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`WidgetsConfig::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    /// Defaults, then every existing TOML file from [`WidgetsConfig::config_files`],
    /// then `WIDGETS_*` environment variables.
    #[must_use]
    pub fn figment() -> Figment {
        Self::config_files()
            .into_iter()
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// TOML files that exist on disk, lowest priority first: the user file
    /// under the platform config directory, then `.widgets/config.toml`
    /// relative to the working directory.
    #[must_use]
    pub fn config_files() -> Vec<PathBuf> {
        let user = dirs::config_dir().map(|dir| dir.join("widgets").join("config.toml"));
        let project = Some(PathBuf::from(LOCAL_CONFIG_FILE));
        [user, project]
            .into_iter()
            .flatten()
            .filter(|path| path.is_file())
            .collect()
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.validation.data_var.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "validation.data_var".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
