//! Application configuration module
//!
//! `AppConfig` holds the validated settings of an admin session. It is built
//! through [`AppConfigBuilder`], which can be fed from a TOML file, from the
//! environment, or field by field.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default interval between background refreshes
pub const DEFAULT_REFRESH_SECS: u64 = 30;
/// Default countdown before a delete can be confirmed
pub const DEFAULT_DELETE_COUNTDOWN: u32 = 3;
/// Default timeout for a single HTTP request
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the spreadsheet script endpoint
    pub script_url: String,
    /// Interval of the periodic refresh
    pub refresh_interval: Duration,
    /// Seconds the delete gate counts down before confirming is allowed
    pub delete_countdown: u32,
    /// Timeout applied to every remote request
    pub request_timeout: Duration,
    /// Location of the local cache database, platform data dir when unset
    pub cache_path: Option<PathBuf>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match reqwest::Url::parse(&self.script_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            _ => return Err(ConfigError::InvalidUrl(self.script_url.clone())),
        }
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "refresh_interval",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.delete_countdown == 0 {
            return Err(ConfigError::InvalidValue {
                field: "delete_countdown",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// On-disk shape of `peramore.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    script_url: Option<String>,
    refresh_secs: Option<u64>,
    delete_countdown: Option<u32>,
    timeout_secs: Option<u64>,
    cache_path: Option<PathBuf>,
}

/// Builder for AppConfig
#[derive(Debug, Default, Clone)]
pub struct AppConfigBuilder {
    script_url: Option<String>,
    refresh_interval: Option<Duration>,
    delete_countdown: Option<u32>,
    request_timeout: Option<Duration>,
    cache_path: Option<PathBuf>,
}

impl AppConfigBuilder {
    /// Set the script URL
    pub fn script_url(mut self, url: impl Into<String>) -> Self {
        self.script_url = Some(url.into());
        self
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    pub fn delete_countdown(mut self, seconds: u32) -> Self {
        self.delete_countdown = Some(seconds);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Overlay values from a TOML document
    pub fn merge_toml(mut self, source: &str) -> Result<Self, ConfigError> {
        let file: FileConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Some(url) = file.script_url {
            self.script_url = Some(url);
        }
        if let Some(secs) = file.refresh_secs {
            self.refresh_interval = Some(Duration::from_secs(secs));
        }
        if let Some(countdown) = file.delete_countdown {
            self.delete_countdown = Some(countdown);
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(path) = file.cache_path {
            self.cache_path = Some(path);
        }
        Ok(self)
    }

    /// Overlay values from a TOML file
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.merge_toml(&source)
    }

    /// Overlay values from `PERAMORE_*` variables looked up through `lookup`
    pub fn merge_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PERAMORE_SCRIPT_URL") {
            self.script_url = Some(url);
        }
        if let Some(path) = lookup("PERAMORE_CACHE_PATH") {
            self.cache_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup("PERAMORE_REFRESH_SECS") {
            self.refresh_interval = Some(Duration::from_secs(parse_number("PERAMORE_REFRESH_SECS", &raw)?));
        }
        if let Some(raw) = lookup("PERAMORE_TIMEOUT_SECS") {
            self.request_timeout = Some(Duration::from_secs(parse_number("PERAMORE_TIMEOUT_SECS", &raw)?));
        }
        Ok(self)
    }

    /// Overlay values from the process environment
    pub fn merge_env(self) -> Result<Self, ConfigError> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            script_url: self.script_url.ok_or(ConfigError::MissingValue("script_url"))?,
            refresh_interval: self
                .refresh_interval
                .unwrap_or(Duration::from_secs(DEFAULT_REFRESH_SECS)),
            delete_countdown: self.delete_countdown.unwrap_or(DEFAULT_DELETE_COUNTDOWN),
            request_timeout: self
                .request_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            cache_path: self.cache_path,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        message: format!("expected a whole number of seconds, got {:?}", raw),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
    #[error("cannot read {path:?}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("cannot parse configuration: {0}")]
    Parse(String),
}
