//! Client configuration.
//!
//! Values come from the environment with defaults suitable for a local mock
//! server, mirroring how the mock server itself reads `PORT`.

use std::time::Duration;

use thiserror::Error;

pub const BASE_URL_VAR: &str = "SERVICE_BASE_URL";
pub const APP_ID_VAR: &str = "SERVICE_APP_ID";
pub const TIMEOUT_SECS_VAR: &str = "SERVICE_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_APP_ID: &str = "default-app";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive whole number of seconds, got `{value}`")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Where the backend lives and how long a single call may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub app_id: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str, app_id: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            app_id: app_id.to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read configuration from `SERVICE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source. Unset variables
    /// fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_VAR) {
            if url.trim().is_empty() {
                return Err(ConfigError::Empty { var: BASE_URL_VAR });
            }
            config.base_url = url;
        }
        if let Some(app_id) = lookup(APP_ID_VAR) {
            if app_id.trim().is_empty() {
                return Err(ConfigError::Empty { var: APP_ID_VAR });
            }
            config.app_id = app_id;
        }
        if let Some(raw) = lookup(TIMEOUT_SECS_VAR) {
            // A zero timeout would fail every call before it is sent.
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    var: TIMEOUT_SECS_VAR,
                    value: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
