//! Domain types and validators for client configuration.
//!
//! Pure functions only. No I/O, async, or filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080";
pub const DEFAULT_DEPLOYMENT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Upper bound for `default_deployment_timeout_secs` (one day).
pub const MAX_DEPLOYMENT_TIMEOUT_SECS: u64 = 86_400;

// ── Config schema ────────────────────────────────────────────────────────────

/// Client configuration stored in `~/.converge/config.yaml`.
///
/// Every field has a default so a partial (or missing) file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheduler base URL.
    pub endpoint: String,
    /// Wait budget used when a caller passes a zero timeout.
    pub default_deployment_timeout_secs: u64,
    /// Delay between convergence polls.
    pub poll_interval_ms: u64,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            default_deployment_timeout_secs: DEFAULT_DEPLOYMENT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn default_deployment_timeout(&self) -> Duration {
        Duration::from_secs(self.default_deployment_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Endpoint without a trailing slash, ready for path concatenation.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

/// Partial overrides read from `CONVERGE_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub default_deployment_timeout_secs: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Layer the overrides on top of `config`.
    #[must_use]
    pub fn apply(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        if let Some(secs) = self.default_deployment_timeout_secs {
            config.default_deployment_timeout_secs = secs;
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval_ms = ms;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        config
    }
}

// ── Settable keys ────────────────────────────────────────────────────────────

/// Keys accepted by `converge config set`.
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "endpoint",
    "default_deployment_timeout_secs",
    "poll_interval_ms",
    "request_timeout_secs",
];

/// Validates a configuration key.
///
/// # Errors
///
/// Returns an error if the key is not one of [`VALID_CONFIG_KEYS`].
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Sets `key` to the parsed `value` on `config`.
///
/// The result is not validated as a whole; call [`validate_config`] after.
///
/// # Errors
///
/// Returns an error if the key is unknown or a numeric value does not parse.
pub fn set_config_value(config: &mut ClientConfig, key: &str, value: &str) -> Result<()> {
    let number = || {
        value.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
    };
    match key {
        "endpoint" => config.endpoint = value.to_string(),
        "default_deployment_timeout_secs" => config.default_deployment_timeout_secs = number()?,
        "poll_interval_ms" => config.poll_interval_ms = number()?,
        "request_timeout_secs" => config.request_timeout_secs = number()?,
        _ => validate_config_key(key)?,
    }
    Ok(())
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a fully layered configuration.
///
/// # Errors
///
/// Returns an error if the endpoint is not an HTTP(S) URL, the default
/// deployment timeout exceeds [`MAX_DEPLOYMENT_TIMEOUT_SECS`], the poll
/// interval is zero, or the poll interval exceeds the deployment timeout.
pub fn validate_config(config: &ClientConfig) -> Result<()> {
    let endpoint = config.endpoint.as_str();
    let has_scheme = endpoint.strip_prefix("http://").or_else(|| endpoint.strip_prefix("https://"));
    if has_scheme.is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidEndpoint(config.endpoint.clone()).into());
    }
    if config.default_deployment_timeout_secs > MAX_DEPLOYMENT_TIMEOUT_SECS {
        return Err(ConfigError::DeploymentTimeoutTooLong {
            timeout_secs: config.default_deployment_timeout_secs,
            max_secs: MAX_DEPLOYMENT_TIMEOUT_SECS,
        }
        .into());
    }
    if config.poll_interval_ms == 0 {
        return Err(ConfigError::ZeroPollInterval.into());
    }
    if config.poll_interval() > config.default_deployment_timeout() {
        return Err(ConfigError::PollIntervalTooLong {
            interval_ms: config.poll_interval_ms,
            timeout_secs: config.default_deployment_timeout_secs,
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
