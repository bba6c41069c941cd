//! Infrastructure implementation of the `ConfigStore` port, plus the
//! `CONVERGE_*` environment layer.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::{ClientConfig, ConfigOverrides};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "CONVERGE_CONFIG";

/// Prefix for per-field environment overrides.
pub const ENV_PREFIX: &str = "CONVERGE_";

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
#[derive(Debug, Clone, Default)]
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store resolved from `$CONVERGE_CONFIG` or `~/.converge/config.yaml`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pinned to an explicit file.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ClientConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(ClientConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn save(&self, config: &ClientConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", path.display()))?;
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".converge").join("config.yaml"))
    }
}

/// Overrides from the process environment.
///
/// # Errors
///
/// Returns an error if a `CONVERGE_*` numeric variable does not parse.
pub fn env_overrides() -> Result<ConfigOverrides> {
    overrides_from(std::env::vars())
}

/// Overrides from an explicit set of variables. Unprefixed and unknown
/// variables are ignored.
///
/// # Errors
///
/// Returns an error if a numeric override does not parse.
pub fn overrides_from<I>(vars: I) -> Result<ConfigOverrides>
where
    I: IntoIterator<Item = (String, String)>,
{
    envy::prefixed(ENV_PREFIX)
        .from_iter(vars)
        .context("failed to read CONVERGE_* environment overrides")
}
