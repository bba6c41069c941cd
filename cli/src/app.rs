//! Application context — unified state passed to every command handler.
//!
//! `AppContext` carries the output settings, the configuration store, and
//! the cancellation token that Ctrl-C trips. Commands build their scheduler
//! client and orchestrator from it on demand, so `converge config` works
//! even when the stored configuration is invalid.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::services::config_service;
use crate::application::{ConvergencePoller, DeploymentOrchestrator};
use crate::domain::config::ClientConfig;
use crate::infra::config::{YamlConfigStore, env_overrides};
use crate::infra::http::HttpCatalog;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer, TerminalReporter};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `CONVERGE_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// `--endpoint`, highest-precedence configuration layer.
    pub endpoint: Option<String>,
}

/// The orchestrator type every command uses.
pub type Orchestrator<'a> = DeploymentOrchestrator<HttpCatalog, ConvergencePoller, TerminalReporter<'a>>;

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    ///
    /// Quiet whenever JSON mode is active so progress lines never mix with
    /// the JSON document on stdout.
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration file store.
    pub config_store: YamlConfigStore,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
    /// Tripped by Ctrl-C.
    pub cancel: CancellationToken,
    endpoint: Option<String>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags, cancel: CancellationToken) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("CONVERGE_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet || flags.output.json),
            mode,
            config_store: YamlConfigStore::new(),
            non_interactive,
            cancel,
            endpoint: flags.endpoint.clone(),
        }
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Effective configuration: file, `CONVERGE_*` environment, `--endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if any layer fails to load or the result is invalid.
    pub fn client_config(&self) -> Result<ClientConfig> {
        config_service::resolve_config(&self.config_store, env_overrides()?, self.endpoint.clone())
    }

    /// Orchestrator bound to the scheduler, this context's reporter, and the
    /// Ctrl-C token.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn orchestrator(&self) -> Result<Orchestrator<'_>> {
        let config = self.client_config()?;
        tracing::debug!(endpoint = %config.base_url(), "using scheduler");
        let scheduler = HttpCatalog::new(&config)?;
        Ok(DeploymentOrchestrator::new(scheduler, &config)
            .with_reporter(TerminalReporter::new(&self.output))
            .with_cancellation(self.cancel.clone()))
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `CONVERGE_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
