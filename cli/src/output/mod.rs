//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use anyhow::Result;
use console::Term;
use converge_common::{ApplicationState, DeploymentId};
use owo_colors::OwoColorize as _;
use serde::Serialize;

use crate::domain::config::ClientConfig;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

// ── JSON views ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentView<'a> {
    id: &'a str,
    action: &'a str,
    #[serde(flatten)]
    handle: &'a DeploymentId,
}

#[derive(Serialize)]
struct HealthView<'a> {
    id: &'a str,
    healthy: bool,
}

#[derive(Serialize)]
struct ConvergedView<'a> {
    id: &'a str,
    converged: bool,
}

#[derive(Serialize)]
struct VersionsView<'a> {
    id: &'a str,
    versions: &'a [String],
}

#[derive(Serialize)]
struct SettingView<'a> {
    key: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct ConfigView<'a> {
    path: String,
    config: &'a ClientConfig,
}

/// Renderer selected by the global `--json` flag.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_apps(&self, apps: &[ApplicationState]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_apps(apps);
                Ok(())
            }
            Self::Json(r) => r.render(apps),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_app(&self, app: &ApplicationState) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_app(app);
                Ok(())
            }
            Self::Json(r) => r.render(app),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_created(&self, app: &ApplicationState) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_created(app);
                Ok(())
            }
            Self::Json(r) => r.render(app),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_deployment(&self, action: &str, id: &str, handle: &DeploymentId) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_deployment(action, id, handle);
                Ok(())
            }
            Self::Json(r) => r.render(&DeploymentView { id, action, handle }),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_health(&self, id: &str, healthy: bool) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_health(id, healthy);
                Ok(())
            }
            Self::Json(r) => r.render(&HealthView { id, healthy }),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_converged(&self, id: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_converged(id);
                Ok(())
            }
            Self::Json(r) => r.render(&ConvergedView { id, converged: true }),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_versions(&self, id: &str, versions: &[String]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_versions(id, versions);
                Ok(())
            }
            Self::Json(r) => r.render(&VersionsView { id, versions }),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &ClientConfig, path: &std::path::Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path);
                Ok(())
            }
            Self::Json(r) => r.render(&ConfigView {
                path: path.display().to_string(),
                config,
            }),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_setting(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_setting(key, value);
                Ok(())
            }
            Self::Json(r) => r.render(&SettingView { key, value }),
        }
    }
}
