//! Top-level Fieldsense configuration with 4-layer resolution.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ForecastConfig, RecommenderConfig, StorageConfig};
use crate::constants::MAX_READ_POOL_SIZE;
use crate::errors::{ConfigError, ConfigLayer};

/// Project config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "fieldsense.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (`CliOverrides`)
/// 2. Environment variables (`FIELDSENSE_*`)
/// 3. Project config (`fieldsense.toml` in project root)
/// 4. User config (`~/.fieldsense/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FieldsenseConfig {
    pub recommender: RecommenderConfig,
    pub forecast: ForecastConfig,
    pub storage: StorageConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub exploration_rate: Option<f64>,
    pub seed: Option<u64>,
    pub days_ahead: Option<u32>,
    pub database_path: Option<String>,
}

/// A setting reachable from every layer: its TOML key and its variable.
#[derive(Debug, Clone, Copy)]
struct Setting {
    key: &'static str,
    env: &'static str,
}

impl Setting {
    fn invalid(self, layer: ConfigLayer, message: &str) -> ConfigError {
        ConfigError::ValidationFailed {
            layer,
            key: if layer == ConfigLayer::Env { self.env } else { self.key },
            message: message.to_string(),
        }
    }

    /// Parse the variable. Unset or unparseable values yield `None`.
    fn read_env<T: FromStr>(self) -> Option<T> {
        let raw = std::env::var(self.env).ok()?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                ::tracing::warn!(variable = self.env, value = %raw, "ignoring unparseable value");
                None
            }
        }
    }
}

const EXPLORATION_RATE: Setting = Setting {
    key: "recommender.exploration_rate",
    env: "FIELDSENSE_EXPLORATION_RATE",
};
const SEED: Setting = Setting {
    key: "recommender.seed",
    env: "FIELDSENSE_SEED",
};
const DAYS_AHEAD: Setting = Setting {
    key: "forecast.days_ahead",
    env: "FIELDSENSE_DAYS_AHEAD",
};
const DATABASE_PATH: Setting = Setting {
    key: "storage.database_path",
    env: "FIELDSENSE_DATABASE_PATH",
};
const READ_POOL_SIZE: Setting = Setting {
    key: "storage.read_pool_size",
    env: "FIELDSENSE_READ_POOL_SIZE",
};

impl FieldsenseConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    ///
    /// Each layer is validated on its own before it is merged, so an error
    /// names the layer that supplied the bad value.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            match Self::read_layer(&path, ConfigLayer::User) {
                Ok(user) => config.merge(&user),
                Err(e @ ConfigError::Unreadable { .. }) => {
                    ::tracing::warn!(error = %e, "ignoring unreadable user config");
                }
                Err(e) => return Err(e),
            }
        }

        let project_path = root.join(PROJECT_CONFIG_FILE);
        if project_path.exists() {
            config.merge(&Self::read_layer(&project_path, ConfigLayer::Project)?);
        }

        config.merge(&Self::env_layer()?);

        if let Some(cli) = cli_overrides {
            config.merge(&Self::cli_layer(cli)?);
        }

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config = Self::parse(toml_str, "<inline>", ConfigLayer::Inline)?;
        config.validate(ConfigLayer::Inline)?;
        Ok(config)
    }

    /// Check every value that is set, attributing failures to `layer`.
    pub fn validate(&self, layer: ConfigLayer) -> Result<(), ConfigError> {
        if let Some(rate) = self.recommender.exploration_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(EXPLORATION_RATE.invalid(layer, "must be between 0.0 and 1.0"));
            }
        }
        if self.forecast.days_ahead == Some(0) {
            return Err(DAYS_AHEAD.invalid(layer, "must be at least 1"));
        }
        if let Some(size) = self.storage.read_pool_size {
            if !(1..=MAX_READ_POOL_SIZE).contains(&size) {
                return Err(READ_POOL_SIZE.invalid(
                    layer,
                    &format!("must be between 1 and {MAX_READ_POOL_SIZE}"),
                ));
            }
        }
        if let Some(ref path) = self.storage.database_path {
            if path.trim().is_empty() {
                return Err(DATABASE_PATH.invalid(layer, "must not be empty"));
            }
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialization {
            message: e.to_string(),
        })
    }

    /// Returns the user config path: `~/.fieldsense/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    fn parse(toml_str: &str, path: &str, layer: ConfigLayer) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            layer,
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Read and validate one config file. Unknown keys are ignored.
    fn read_layer(path: &Path, layer: ConfigLayer) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            layer,
            path: display.clone(),
            message: e.to_string(),
        })?;
        let config = Self::parse(&content, &display, layer)?;
        config.validate(layer)?;
        Ok(config)
    }

    fn env_layer() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.recommender.exploration_rate = EXPLORATION_RATE.read_env();
        config.recommender.seed = SEED.read_env();
        config.forecast.days_ahead = DAYS_AHEAD.read_env();
        config.storage.database_path = DATABASE_PATH.read_env();
        config.storage.read_pool_size = READ_POOL_SIZE.read_env();
        config.validate(ConfigLayer::Env)?;
        Ok(config)
    }

    fn cli_layer(cli: &CliOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.recommender.exploration_rate = cli.exploration_rate;
        config.recommender.seed = cli.seed;
        config.forecast.days_ahead = cli.days_ahead;
        config.storage.database_path = cli.database_path.clone();
        config.validate(ConfigLayer::Cli)?;
        Ok(config)
    }

    /// Take every value `other` sets.
    fn merge(&mut self, other: &FieldsenseConfig) {
        if other.recommender.exploration_rate.is_some() {
            self.recommender.exploration_rate = other.recommender.exploration_rate;
        }
        if other.recommender.seed.is_some() {
            self.recommender.seed = other.recommender.seed;
        }
        if other.forecast.days_ahead.is_some() {
            self.forecast.days_ahead = other.forecast.days_ahead;
        }
        if other.storage.database_path.is_some() {
            self.storage.database_path = other.storage.database_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            self.storage.read_pool_size = other.storage.read_pool_size;
        }
    }
}

/// Returns the user-level config directory: `~/.fieldsense/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".fieldsense"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
