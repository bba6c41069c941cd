//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, or `reqwest`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod health;

pub use config::{
    ClientConfig, ConfigOverrides, VALID_CONFIG_KEYS, set_config_value, validate_config,
    validate_config_key,
};
pub use error::{ConfigError, ConvergeError, error_code};
pub use health::{ReadinessRule, ReadinessVerdict, evaluate, instance_parity};
