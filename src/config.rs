use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_REPORT_PATH: &str = "response.json";
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// Sysfs GPIO wiring for the two output lines.
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GpioConfig {
    #[serde(default = "default_gpio_root")]
    pub root: PathBuf,
    pub line1_pin: u32,
    pub line12_pin: u32,
}

fn default_gpio_root() -> PathBuf {
    PathBuf::from(DEFAULT_GPIO_ROOT)
}

/// Startup configuration, read once from a JSON file.
///
/// Unknown keys are rejected so a misspelled optional setting fails loudly
/// instead of silently falling back to its default.
#[derive(Deserialize, Clone)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    #[serde(alias = "SQUARE_ACCESS_TOKEN")]
    pub api_token: String,
    pub api_url: String,
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    #[serde(default)]
    pub gpio: Option<GpioConfig>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("report_path", &self.report_path)
            .field("gpio", &self.gpio)
            .finish()
    }
}

impl Config {
    /// Reads and validates the config file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::Invalid("apiToken must not be empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "apiUrl must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "pollIntervalMs must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "requestTimeoutMs must be greater than zero".to_string(),
            ));
        }
        if let Some(gpio) = &self.gpio
            && gpio.line1_pin == gpio.line12_pin
        {
            return Err(ConfigError::Invalid(
                "gpio.line1Pin and gpio.line12Pin must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Defaults to the poll interval so a hung request never outlives a tick.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(self.poll_interval_ms))
    }

    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH))
    }
}
