//! Configuration management for wxdash.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "wxdash";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "weather.db";

/// Log file used while the dashboard owns the terminal.
const LOG_FILE_NAME: &str = "wxdash.log";

/// Environment variable prefix for all settings.
const ENV_PREFIX: &str = "WXDASH_";

/// Placeholder shown instead of the API key.
const REDACTED: &str = "********";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `WXDASH_`, `__` between sections)
/// 2. `OPENWEATHER_API_KEY` and `DEFAULT_CITY`
/// 3. TOML config file at `~/.config/wxdash/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weather API configuration.
    pub api: ApiConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Dashboard configuration.
    pub dashboard: DashboardConfig,
}

/// Unit system requested from the weather API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius, metres per second.
    #[default]
    Metric,
    /// Fahrenheit, miles per hour.
    Imperial,
    /// Kelvin, metres per second.
    Standard,
}

impl Units {
    /// Value of the `units` query parameter.
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    /// Temperature unit symbol.
    #[must_use]
    pub fn temperature_unit(self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }

    /// Wind speed unit symbol.
    #[must_use]
    pub fn speed_unit(self) -> &'static str {
        match self {
            Self::Imperial => "mph",
            Self::Metric | Self::Standard => "m/s",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Weather API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// OpenWeatherMap API key.
    pub key: Option<String>,
    /// Base URL of the current-weather API.
    pub base_url: String,
    /// Unit system for readings.
    pub units: Units,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/wxdash/weather.db`
    pub database_path: Option<PathBuf>,
    /// How many times to try connecting before giving up.
    pub connect_attempts: u32,
    /// Seconds to wait between connection attempts.
    pub connect_wait_secs: u64,
}

/// Dashboard-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// City shown when none is given on the command line.
    pub default_city: String,
    /// Seconds between refreshes.
    pub refresh_interval_secs: u64,
    /// Number of stored readings plotted in the trend charts.
    pub history_limit: usize,
}

impl ApiConfig {
    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            units: Units::Metric,
            timeout_secs: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            connect_attempts: 40,
            connect_wait_secs: 5,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_city: "Bangalore".to_string(),
            refresh_interval_secs: 30,
            history_limit: 50,
        }
    }
}

impl Config {
    /// Load configuration from all sources, reading `config_path` or the
    /// default config file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the layered provider stack.
    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(
                Env::raw()
                    .only(&["OPENWEATHER_API_KEY"])
                    .map(|_| "api.key".into()),
            )
            .merge(
                Env::raw()
                    .only(&["DEFAULT_CITY"])
                    .map(|_| "dashboard.default_city".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(Error::config_validation(format!(
                "api.base_url must be an http(s) URL, got {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(Error::config_validation(
                "api.timeout_secs must be greater than 0",
            ));
        }

        if self.storage.connect_attempts == 0 {
            return Err(Error::config_validation(
                "storage.connect_attempts must be greater than 0",
            ));
        }

        if self.dashboard.default_city.trim().is_empty() {
            return Err(Error::config_validation(
                "dashboard.default_city must not be empty",
            ));
        }

        if self.dashboard.refresh_interval_secs == 0 {
            return Err(Error::config_validation(
                "dashboard.refresh_interval_secs must be greater than 0",
            ));
        }

        if self.dashboard.history_limit == 0 {
            return Err(Error::config_validation(
                "dashboard.history_limit must be greater than 0",
            ));
        }

        Ok(())
    }

    /// A copy of this configuration that is safe to print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.api.key.is_some() {
            config.api.key = Some(REDACTED.to_string());
        }
        config
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the dashboard log file path.
    #[must_use]
    pub fn default_log_path() -> PathBuf {
        Self::default_data_dir().join(LOG_FILE_NAME)
    }

    /// Get the wait between connection attempts as a Duration.
    #[must_use]
    pub fn connect_wait(&self) -> Duration {
        Duration::from_secs(self.storage.connect_wait_secs)
    }

    /// Get the refresh interval as a Duration.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard.refresh_interval_secs)
    }
}
