//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, or `reqwest`. All error types implement
//! `thiserror::Error` and convert to `anyhow::Error` via the `?` operator;
//! callers that need the variant use `downcast_ref::<ConvergeError>()`.

use std::time::Duration;

use thiserror::Error;

// ── Convergence errors ────────────────────────────────────────────────────────

/// Outcomes of talking to the scheduler and waiting on it.
#[derive(Debug, Error)]
pub enum ConvergeError {
    #[error("Application '{0}' does not exist.")]
    NotFound(String),

    /// A list or fetch failed. Absorbed by the poller; only surfaces from
    /// single-shot calls.
    #[error("Scheduler request failed: {0}")]
    Transient(String),

    #[error("Application '{id}' did not reach steady state within {}s.", .timeout.as_secs_f64())]
    Timeout { id: String, timeout: Duration },

    #[error("Wait for application '{0}' was cancelled.")]
    Cancelled(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Scheduler returned a malformed snapshot for '{0}' (negative instance counts).")]
    MalformedState(String),
}

impl ConvergeError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Transient(_) => "transient",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled(_) => "cancelled",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::MalformedState(_) => "malformed_state",
        }
    }
}

impl From<converge_common::AppIdError> for ConvergeError {
    fn from(err: converge_common::AppIdError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to client configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid endpoint '{0}': must start with http:// or https://")]
    InvalidEndpoint(String),

    #[error("default_deployment_timeout_secs ({timeout_secs}) must not exceed {max_secs}")]
    DeploymentTimeoutTooLong { timeout_secs: u64, max_secs: u64 },

    #[error("poll_interval_ms must be greater than zero")]
    ZeroPollInterval,

    #[error(
        "poll_interval_ms ({interval_ms}) must not exceed the default deployment timeout ({timeout_secs}s)"
    )]
    PollIntervalTooLong { interval_ms: u64, timeout_secs: u64 },

    #[error("Unknown setting: {key}. Valid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Machine-readable code for any error that reaches the top level.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<ConvergeError>() {
        return e.code();
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return "invalid_config";
    }
    "error"
}
