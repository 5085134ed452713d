use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::PathBuf;
use std::time::Duration;

/// File looked up in the working directory when `PERAMORE_CONFIG` is unset
const DEFAULT_CONFIG_FILE: &str = "peramore.toml";

/// Application configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self { app: builder.build()? })
    }

    /// Load defaults, then the TOML file, then `PERAMORE_*` variables
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();

        let file = std::env::var("PERAMORE_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(|| {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                fallback.exists().then_some(fallback)
            });
        if let Some(path) = file {
            tracing::debug!("Reading configuration from {}", path.display());
            builder = builder.merge_file(&path)?;
        }

        Self::with_builder(builder.merge_env()?)
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn script_url(&self) -> &str {
        &self.app.script_url
    }

    /// URL of a read action, e.g. `?action=get_products`
    pub fn action_url(&self, action: &str) -> String {
        let separator = if self.app.script_url.contains('?') { '&' } else { '?' };
        format!("{}{}action={}", self.app.script_url, separator, action)
    }

    pub fn refresh_interval(&self) -> Duration {
        self.app.refresh_interval
    }

    pub fn delete_countdown(&self) -> u32 {
        self.app.delete_countdown
    }

    pub fn request_timeout(&self) -> Duration {
        self.app.request_timeout
    }

    /// Cache database location, platform data directory when not configured
    pub fn cache_path(&self) -> PathBuf {
        match &self.app.cache_path {
            Some(path) => path.clone(),
            None => {
                let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
                path.push("peramore");
                path.push("cache.db");
                path
            }
        }
    }
}
