//! Configuration loading
//!
//! Each setting is resolved independently with this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not fatal: a warning is logged and the
//! remaining sources apply. A config file that exists but does not parse
//! is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Default base URL of the HTTP listing/auth service
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
/// Default URL of the realtime status channel
pub const DEFAULT_REALTIME_URL: &str = "ws://localhost:5001";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_URL: &str = "MCC_API_URL";
pub const ENV_REALTIME_URL: &str = "MCC_REALTIME_URL";
pub const ENV_TOKEN_FILE: &str = "MCC_TOKEN_FILE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "MCC_REQUEST_TIMEOUT_SECS";

const APP_DIR: &str = "mcc";
const CONFIG_FILE_NAME: &str = "config.toml";
const TOKEN_FILE_NAME: &str = "session.toml";

/// Fully resolved console configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Base URL for `GET /media` and `POST /login`, without trailing slash
    pub api_url: String,
    /// WebSocket URL of the push channel, without trailing slash
    pub realtime_url: String,
    /// File backing the session token store
    pub token_file: PathBuf,
    pub request_timeout: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            realtime_url: DEFAULT_REALTIME_URL.to_string(),
            token_file: default_token_file(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ConsoleConfig {
    /// Join a path onto the API base URL
    pub fn api_endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

/// On-disk config file layout; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api_url: Option<String>,
    pub realtime_url: Option<String>,
    pub token_file: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub realtime_url: Option<String>,
    pub token_file: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

/// Resolves [`ConsoleConfig`] from all configuration sources
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    overrides: ConfigOverrides,
    config_file: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(overrides: ConfigOverrides) -> Self {
        Self {
            overrides,
            config_file: None,
        }
    }

    /// Use an explicit config file instead of the platform default
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    pub fn resolve(&self) -> Result<ConsoleConfig> {
        let file = self.load_file()?;

        let api_url = self
            .overrides
            .api_url
            .clone()
            .or_else(|| env_string(ENV_API_URL))
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let realtime_url = self
            .overrides
            .realtime_url
            .clone()
            .or_else(|| env_string(ENV_REALTIME_URL))
            .or(file.realtime_url)
            .unwrap_or_else(|| DEFAULT_REALTIME_URL.to_string());

        let token_file = self
            .overrides
            .token_file
            .clone()
            .or_else(|| env_string(ENV_TOKEN_FILE).map(PathBuf::from))
            .or(file.token_file)
            .unwrap_or_else(default_token_file);

        let timeout_secs = match self.overrides.request_timeout_secs {
            Some(secs) => secs,
            None => match env_string(ENV_REQUEST_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                    Error::Config(format!("{} must be a number of seconds: {}", ENV_REQUEST_TIMEOUT_SECS, e))
                })?,
                None => file.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
        };

        let config = ConsoleConfig {
            api_url: validate_url("api_url", &api_url, &["http://", "https://"])?,
            realtime_url: validate_url("realtime_url", &realtime_url, &["ws://", "wss://"])?,
            token_file,
            request_timeout: Duration::from_secs(timeout_secs),
        };
        debug!(?config, "Resolved console configuration");
        Ok(config)
    }

    fn load_file(&self) -> Result<TomlConfig> {
        let path = match self.config_file.clone().or_else(default_config_path) {
            Some(path) => path,
            None => return Ok(TomlConfig::default()),
        };

        if !path.exists() {
            if self.config_file.is_some() {
                warn!("Config file {} not found, using defaults", path.display());
            } else {
                debug!("No config file at {}", path.display());
            }
            return Ok(TomlConfig::default());
        }

        load_toml_config(&path)
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Platform config file location (`~/.config/mcc/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Platform token file location (`~/.config/mcc/session.toml` on Linux)
pub fn default_token_file() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR).join(TOKEN_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(TOKEN_FILE_NAME))
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn validate_url(field: &str, value: &str, schemes: &[&str]) -> Result<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if !schemes.iter().any(|scheme| trimmed.starts_with(scheme)) {
        return Err(Error::Config(format!(
            "{} must start with one of {:?}, got {:?}",
            field, schemes, value
        )));
    }
    Ok(trimmed.to_string())
}
