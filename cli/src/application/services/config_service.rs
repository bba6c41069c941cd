//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{ClientConfig, ConfigOverrides, set_config_value, validate_config};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn load_config(store: &impl ConfigStore) -> Result<ClientConfig> {
    store.load()
}

/// Effective configuration: file, then environment, then `--endpoint`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the layered result fails
/// validation.
pub fn resolve_config(
    store: &impl ConfigStore,
    overrides: ConfigOverrides,
    endpoint: Option<String>,
) -> Result<ClientConfig> {
    let mut config = overrides.apply(store.load()?);
    if let Some(endpoint) = endpoint {
        config.endpoint = endpoint;
    }
    validate_config(&config)?;
    Ok(config)
}

/// Set one key in the stored file. Environment overrides are not consulted.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, the result fails
/// validation, or the store cannot be written.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<ClientConfig> {
    let mut config = store.load()?;
    set_config_value(&mut config, key, value)?;
    validate_config(&config)?;
    store.save(&config)?;
    Ok(config)
}
