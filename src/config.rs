//! Client configuration
//!
//! Values are resolved with the following priority (highest first):
//! 1. Environment variables (`RADASSIST_API_URL`, `RADASSIST_TIMEOUT_MS`)
//! 2. TOML file at `$XDG_CONFIG_HOME/radassist/config.toml`
//! 3. Default values
//!
//! ```toml
//! [service]
//! base_url = "http://localhost:8000"
//! analyze_path = "/api/analyze"
//! health_path = "/api/health"
//! timeout_ms = 30000
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const ENV_API_URL: &str = "RADASSIST_API_URL";
pub const ENV_TIMEOUT_MS: &str = "RADASSIST_TIMEOUT_MS";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// `[service]` table of the config file
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ServiceToml {
    base_url: Option<String>,
    analyze_path: Option<String>,
    health_path: Option<String>,
    timeout_ms: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigToml {
    service: ServiceToml,
}

/// Resolved settings for the analysis client
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Scheme, host and port of the analysis service
    pub api_base_url: String,
    /// Path of the analyze endpoint
    pub analyze_path: String,
    /// Path of the health endpoint
    pub health_path: String,
    /// How long a submission may take before it counts as failed
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            analyze_path: "/api/analyze".to_string(),
            health_path: "/api/health".to_string(),
            timeout: Duration::from_millis(30_000),
        }
    }
}

impl Settings {
    pub fn analyze_url(&self) -> String {
        join_url(&self.api_base_url, &self.analyze_path)
    }

    pub fn health_url(&self) -> String {
        join_url(&self.api_base_url, &self.health_path)
    }

    fn apply_file(&mut self, file: ConfigToml) {
        let service = file.service;
        if let Some(base_url) = service.base_url {
            self.api_base_url = base_url;
        }
        if let Some(path) = service.analyze_path {
            self.analyze_path = path;
        }
        if let Some(path) = service.health_path {
            self.health_path = path;
        }
        if let Some(ms) = service.timeout_ms {
            self.timeout = Duration::from_millis(ms);
        }
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_TIMEOUT_MS} is not a number: {raw:?}"))
            })?;
            self.timeout = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid("timeout must be greater than zero".into()));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "base url must be http(s): {}",
                self.api_base_url
            )));
        }
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// `$XDG_CONFIG_HOME/radassist/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("radassist").join("config.toml"))
}

/// Load settings from the default file location and the process environment
pub fn load() -> Result<Settings, ConfigError> {
    load_from(default_config_path().as_deref(), |key| std::env::var(key).ok())
}

/// Load settings from an optional file and an environment lookup
pub fn load_from<F>(path: Option<&Path>, env: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Some(path) = path.filter(|p| p.exists()) {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        settings.apply_file(toml::from_str(&raw)?);
        info!("⚙️  Loaded config from {}", path.display());
    }

    settings.apply_env(env)?;
    settings.validate()?;

    Ok(settings)
}
