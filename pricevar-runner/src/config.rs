//! Application configuration.
//!
//! Resolution order: built-in defaults, then a TOML file, then CLI flags
//! (applied by the binary). Every field is optional in the file.

use pricevar_core::data::YahooConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where charts go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Terminal when stdout is a TTY, otherwise file snapshots.
    #[default]
    Auto,
    /// Full-screen terminal chart, blocking until a key is pressed.
    Terminal,
    /// Text snapshot written next to the data files.
    File,
}

/// Size of file snapshots, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub auto_adjust: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let yahoo = YahooConfig::default();
        Self {
            base_url: yahoo.base_url,
            timeout_secs: yahoo.timeout.as_secs(),
            user_agent: yahoo.user_agent,
            auto_adjust: yahoo.auto_adjust,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory receiving the CSV, spreadsheet, and chart snapshots.
    pub output_dir: PathBuf,
    pub display: DisplayMode,
    pub chart: ChartConfig,
    pub provider: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            display: DisplayMode::default(),
            chart: ChartConfig::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `explicit` if given, else the per-user config file if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading user config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config_dir>/pricevar/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pricevar").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.chart.width < 20 || self.chart.height < 10 {
            return Err(ConfigError::Invalid(format!(
                "chart size {}x{} is below the 20x10 minimum",
                self.chart.width, self.chart.height
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir must not be empty".into()));
        }
        Ok(())
    }

    pub fn yahoo_config(&self) -> YahooConfig {
        YahooConfig {
            base_url: self.provider.base_url.clone(),
            timeout: Duration::from_secs(self.provider.timeout_secs),
            user_agent: self.provider.user_agent.clone(),
            auto_adjust: self.provider.auto_adjust,
        }
    }
}
