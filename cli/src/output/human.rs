//! Human-readable terminal renderer.

use converge_common::{ApplicationState, DeploymentId, HealthStatus, TaskState};
use owo_colors::OwoColorize as _;

use crate::domain::config::ClientConfig;
use crate::domain::health::{ReadinessVerdict, evaluate};
use crate::output::{OutputContext, Styles};

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the application listing as a table.
    pub fn render_apps(&self, apps: &[ApplicationState]) {
        if apps.is_empty() {
            self.ctx.info("No applications.");
            return;
        }
        println!(
            "  {}",
            format!("{:<32} {:>9} {:>9}  {}", "ID", "TASKS", "HEALTHY", "DEPLOYING")
                .style(self.ctx.styles.dim)
        );
        for app in apps {
            let deploying = if app.deployments.is_empty() { "" } else { "yes" };
            println!(
                "  {:<32} {:>9} {:>9}  {deploying}",
                app.id,
                format_tasks(app),
                app.tasks_healthy
            );
        }
    }

    /// Render one application snapshot, tasks included.
    pub fn render_app(&self, app: &ApplicationState) {
        self.ctx.header(&app.id);
        self.ctx.kv("Instances:", &app.instances.to_string());
        self.ctx.kv("Running:", &format_tasks(app));
        self.ctx.kv("Staged:", &app.tasks_staged.to_string());
        self.ctx.kv("Health checks:", &app.health_checks.len().to_string());
        if let Some(version) = &app.version {
            self.ctx.kv("Version:", version);
        }
        let verdict = evaluate(app);
        self.ctx.kv(
            "Status:",
            &verdict_display(verdict).style(self.ctx.styles.verdict(verdict)).to_string(),
        );

        let deployments = app.deployment_ids();
        if !deployments.is_empty() {
            let ids: Vec<&str> = deployments.iter().map(|d| d.deployment_id.as_str()).collect();
            self.ctx.kv("Deployments:", &ids.join(", "));
        }

        if !app.tasks.is_empty() && !self.ctx.quiet {
            println!();
            self.ctx.header("Tasks:");
            for task in &app.tasks {
                println!(
                    "    {}",
                    format_task_line(task, app.health_checks.len(), &self.ctx.styles)
                );
            }
        }
    }

    /// Render the handle of an accepted mutation.
    pub fn render_deployment(&self, action: &str, id: &str, handle: &DeploymentId) {
        self.ctx
            .success(&format!("{action} {id} accepted (deployment {})", handle.deployment_id));
    }

    /// Render the echo of a create request.
    pub fn render_created(&self, app: &ApplicationState) {
        self.ctx.success(&format!("Created {}", app.id));
        for handle in app.deployment_ids() {
            self.ctx.kv("Deployment:", &handle.deployment_id);
        }
    }

    /// Render the result of a health query.
    pub fn render_health(&self, id: &str, healthy: bool) {
        if healthy {
            self.ctx.success(&format!("{id} is healthy"));
        } else {
            self.ctx.warn(&format!("{id} is not healthy"));
        }
    }

    /// Render a completed wait.
    pub fn render_converged(&self, id: &str) {
        self.ctx.success(&format!("{id} reached steady state"));
    }

    /// Render an application's version history.
    pub fn render_versions(&self, id: &str, versions: &[String]) {
        self.ctx.header(&format!("Versions of {id}:"));
        if versions.is_empty() {
            self.ctx.info("No recorded versions.");
            return;
        }
        if !self.ctx.quiet {
            for version in versions {
                println!("    {version}");
            }
        }
    }

    /// Render a changed configuration key.
    pub fn render_setting(&self, key: &str, value: &str) {
        self.ctx.success(&format!("Set {key} = {value}"));
    }

    /// Render the stored configuration.
    pub fn render_config(&self, config: &ClientConfig, path: &std::path::Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<34} {}", "endpoint:", config.endpoint);
        println!(
            "  {:<34} {}",
            "default_deployment_timeout_secs:", config.default_deployment_timeout_secs
        );
        println!("  {:<34} {}", "poll_interval_ms:", config.poll_interval_ms);
        println!("  {:<34} {}", "request_timeout_secs:", config.request_timeout_secs);
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["CONVERGE_CONFIG", "CONVERGE_ENDPOINT", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

/// `running/desired`, e.g. `2/3`.
#[must_use]
pub fn format_tasks(app: &ApplicationState) -> String {
    format!("{}/{}", app.tasks_running, app.instances)
}

#[must_use]
pub fn verdict_display(verdict: ReadinessVerdict) -> &'static str {
    match verdict {
        ReadinessVerdict::Ready => "healthy",
        ReadinessVerdict::NotReady => "converging",
        ReadinessVerdict::Error => "malformed",
    }
}

#[must_use]
pub fn health_status_display(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Alive => "alive",
        HealthStatus::NotAlive => "failing",
        HealthStatus::Unknown => "unknown",
    }
}

/// One line per task: id, host, and the status of each declared check.
#[must_use]
pub fn format_task_line(task: &TaskState, checks: usize, styles: &Styles) -> String {
    let host = task.host.as_deref().unwrap_or("-");
    if checks == 0 {
        return format!("{}  {host}", task.id);
    }
    let statuses: Vec<String> = (0..checks)
        .map(|i| {
            let status = task.health_status(i);
            health_status_display(status).style(styles.health(status)).to_string()
        })
        .collect();
    format!("{}  {host}  [{}]", task.id, statuses.join(", "))
}
