//! Application service — deployment orchestration use-case.
//!
//! Imports only from `crate::domain` and `crate::application`.
//! All I/O is routed through the injected [`Scheduler`] port.
//!
//! Two waits are offered and they are deliberately different:
//! [`DeploymentOrchestrator::wait_for_steady_state`] converges on instance
//! parity only (what mutating calls block on), while
//! [`DeploymentOrchestrator::wait_until_healthy`] and
//! [`DeploymentOrchestrator::is_application_healthy`] also require every
//! health check to be green.

use std::time::Duration;

use anyhow::Result;
use converge_common::{
    ApplicationDefinition, ApplicationState, DeploymentId, normalize_app_id, same_app,
    validate_app_id,
};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ProgressReporter, Scheduler, SilentReporter};
use crate::application::services::deadline::{Bounded, effective_timeout, run_bounded};
use crate::application::services::poller::{ConvergencePoller, ConvergenceWatcher, PollOutcome};
use crate::domain::config::ClientConfig;
use crate::domain::error::ConvergeError;
use crate::domain::health::{ReadinessRule, ReadinessVerdict, evaluate};

/// Whether a mutating call blocks until the application converges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitPolicy {
    /// Return as soon as the scheduler accepts the mutation.
    #[default]
    Return,
    /// Block until instance parity, bounded by the given timeout
    /// (zero means the configured default).
    SteadyState(Duration),
}

impl WaitPolicy {
    /// Wait with the configured default timeout.
    #[must_use]
    pub const fn steady_state() -> Self {
        Self::SteadyState(Duration::ZERO)
    }

    /// `--wait` / `--timeout` flags to a policy.
    #[must_use]
    pub fn from_flags(wait: bool, timeout: Option<Duration>) -> Self {
        if wait || timeout.is_some() {
            Self::SteadyState(timeout.unwrap_or(Duration::ZERO))
        } else {
            Self::Return
        }
    }
}

/// Façade over the scheduler for mutating calls and readiness queries.
pub struct DeploymentOrchestrator<S, W = ConvergencePoller, R = SilentReporter> {
    scheduler: S,
    watcher: W,
    reporter: R,
    default_timeout: Duration,
    cancel: CancellationToken,
}

impl<S: Scheduler> DeploymentOrchestrator<S> {
    /// Orchestrator with the polling watcher and settings from `config`.
    #[must_use]
    pub fn new(scheduler: S, config: &ClientConfig) -> Self {
        Self {
            scheduler,
            watcher: ConvergencePoller::new(config.poll_interval()),
            reporter: SilentReporter,
            default_timeout: config.default_deployment_timeout(),
            cancel: CancellationToken::new(),
        }
    }
}

impl<S, W, R> DeploymentOrchestrator<S, W, R>
where
    S: Scheduler,
    W: ConvergenceWatcher,
    R: ProgressReporter,
{
    /// Replace the convergence watcher.
    #[must_use]
    pub fn with_watcher<W2: ConvergenceWatcher>(self, watcher: W2) -> DeploymentOrchestrator<S, W2, R> {
        DeploymentOrchestrator {
            scheduler: self.scheduler,
            watcher,
            reporter: self.reporter,
            default_timeout: self.default_timeout,
            cancel: self.cancel,
        }
    }

    /// Replace the progress reporter.
    #[must_use]
    pub fn with_reporter<R2: ProgressReporter>(self, reporter: R2) -> DeploymentOrchestrator<S, W, R2> {
        DeploymentOrchestrator {
            scheduler: self.scheduler,
            watcher: self.watcher,
            reporter,
            default_timeout: self.default_timeout,
            cancel: self.cancel,
        }
    }

    /// Tie every wait issued by this orchestrator to `token`.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Create an application and optionally wait for instance parity.
    ///
    /// On a wait failure the error is returned; the application has still
    /// been created.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid, the scheduler rejects the
    /// definition, or the wait times out or is cancelled.
    pub async fn create_application(
        &self,
        app: &ApplicationDefinition,
        wait: WaitPolicy,
    ) -> Result<ApplicationState> {
        let id = checked_id(&app.id)?;
        let mut definition = app.clone();
        definition.id.clone_from(&id);

        self.reporter.step(&format!("creating {id}..."));
        let created = self.scheduler.submit_create(&definition).await?;
        tracing::info!(app = %id, deployments = ?created.deployment_ids(), "application created");
        self.reporter.success(&format!("{id} submitted"));

        self.settle(&id, wait).await?;
        Ok(created)
    }

    /// Replace an application's definition and optionally wait.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid, the scheduler rejects the
    /// update, or the wait times out or is cancelled.
    pub async fn update_application(
        &self,
        app: &ApplicationDefinition,
        force: bool,
        wait: WaitPolicy,
    ) -> Result<DeploymentId> {
        let id = checked_id(&app.id)?;
        let mut definition = app.clone();
        definition.id.clone_from(&id);

        self.reporter.step(&format!("updating {id}..."));
        let handle = self.scheduler.submit_update(&definition, force).await?;
        tracing::info!(app = %id, deployment = %handle.deployment_id, force, "application updated");
        self.reporter.success(&format!("{id} update accepted ({})", handle.deployment_id));

        self.settle(&id, wait).await?;
        Ok(handle)
    }

    /// Change the desired instance count.
    ///
    /// `force` overrides a deployment that is currently blocking the app.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid, `instances` is negative, the
    /// scheduler rejects the request, or the wait fails.
    pub async fn scale_application(
        &self,
        id: &str,
        instances: i64,
        force: bool,
        wait: WaitPolicy,
    ) -> Result<DeploymentId> {
        let id = checked_id(id)?;
        if instances < 0 {
            return Err(ConvergeError::InvalidArgument(format!(
                "instance count must not be negative (got {instances})"
            ))
            .into());
        }

        self.reporter.step(&format!("scaling {id} to {instances}..."));
        let handle = self.scheduler.submit_scale(&id, instances, force).await?;
        tracing::info!(app = %id, instances, force, deployment = %handle.deployment_id, "scale submitted");
        self.reporter.success(&format!("{id} scale accepted ({})", handle.deployment_id));

        self.settle(&id, wait).await?;
        Ok(handle)
    }

    /// Rolling restart of every task of an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid, the scheduler rejects the
    /// request, or the wait fails.
    pub async fn restart_application(
        &self,
        id: &str,
        force: bool,
        wait: WaitPolicy,
    ) -> Result<DeploymentId> {
        let id = checked_id(id)?;

        self.reporter.step(&format!("restarting {id}..."));
        let handle = self.scheduler.submit_restart(&id, force).await?;
        tracing::info!(app = %id, force, deployment = %handle.deployment_id, "restart submitted");
        self.reporter.success(&format!("{id} restart accepted ({})", handle.deployment_id));

        self.settle(&id, wait).await?;
        Ok(handle)
    }

    /// Remove an application. Deletion is never waited on.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the scheduler rejects it.
    pub async fn delete_application(&self, id: &str) -> Result<DeploymentId> {
        let id = checked_id(id)?;
        let handle = self.scheduler.submit_delete(&id).await?;
        tracing::info!(app = %id, deployment = %handle.deployment_id, "delete submitted");
        Ok(handle)
    }

    /// Switch an application to a previously recorded version.
    ///
    /// # Errors
    ///
    /// Returns an error if the id or version is invalid, the version is not
    /// in the application's history, or the scheduler rejects the request.
    pub async fn set_application_version(&self, id: &str, version: &str) -> Result<DeploymentId> {
        let id = checked_id(id)?;
        if version.trim().is_empty() {
            return Err(ConvergeError::InvalidArgument("version must not be empty".into()).into());
        }
        if !self.has_application_version(&id, version).await? {
            return Err(ConvergeError::NotFound(format!("{id}@{version}")).into());
        }
        let handle = self.scheduler.submit_version(&id, version).await?;
        tracing::info!(app = %id, version, deployment = %handle.deployment_id, "version change submitted");
        Ok(handle)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Every application the scheduler knows about.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    pub async fn list_applications(&self) -> Result<Vec<ApplicationState>> {
        self.scheduler.list_applications().await
    }

    /// Ids of every application.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    pub async fn list_application_ids(&self) -> Result<Vec<String>> {
        self.scheduler.list_application_ids().await
    }

    /// Whether the catalog currently lists `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the listing fails.
    pub async fn has_application(&self, id: &str) -> Result<bool> {
        let id = checked_id(id)?;
        let ids = self.scheduler.list_application_ids().await?;
        Ok(ids.iter().any(|known| same_app(known, &id)))
    }

    /// Current snapshot of an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the fetch fails.
    pub async fn application(&self, id: &str) -> Result<ApplicationState> {
        let id = checked_id(id)?;
        self.scheduler.fetch_application(&id).await
    }

    /// Deployment handles currently attached to an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the fetch fails.
    pub async fn application_deployments(&self, id: &str) -> Result<Vec<DeploymentId>> {
        Ok(self.application(id).await?.deployment_ids())
    }

    /// Recorded versions of an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the request fails.
    pub async fn application_versions(&self, id: &str) -> Result<Vec<String>> {
        let id = checked_id(id)?;
        Ok(self.scheduler.application_versions(&id).await?.versions)
    }

    /// Whether `version` is in the application's history.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is invalid or the request fails.
    pub async fn has_application_version(&self, id: &str, version: &str) -> Result<bool> {
        Ok(self.application_versions(id).await?.iter().any(|v| v == version))
    }

    /// Whether every desired instance is running and every health check of
    /// every task is alive.
    ///
    /// This is stricter than what [`Self::wait_for_steady_state`] waits for.
    ///
    /// # Errors
    ///
    /// Returns [`ConvergeError::NotFound`] if the application is not listed,
    /// [`ConvergeError::MalformedState`] if the snapshot has negative counts,
    /// or the underlying request error.
    pub async fn is_application_healthy(&self, id: &str) -> Result<bool> {
        let id = checked_id(id)?;
        if !self.has_application(&id).await? {
            return Err(ConvergeError::NotFound(id).into());
        }
        let app = self.scheduler.fetch_application(&id).await?;
        match evaluate(&app) {
            ReadinessVerdict::Ready => Ok(true),
            ReadinessVerdict::NotReady => Ok(false),
            ReadinessVerdict::Error => Err(ConvergeError::MalformedState(id).into()),
        }
    }

    // ── Waits ─────────────────────────────────────────────────────────────────

    /// Block until the application's running task count matches its desired
    /// instance count. Health checks are not consulted.
    ///
    /// A zero `timeout` uses the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`ConvergeError::InvalidArgument`] before any request for a
    /// malformed id, [`ConvergeError::Timeout`] when the deadline passes,
    /// and [`ConvergeError::Cancelled`] when the orchestrator's token fires.
    pub async fn wait_for_steady_state(&self, id: &str, timeout: Duration) -> Result<()> {
        let id = checked_id(id)?;
        self.wait_for(&id, ReadinessRule::InstanceParity, timeout).await
    }

    /// Block until [`Self::is_application_healthy`] would return `true`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::wait_for_steady_state`].
    pub async fn wait_until_healthy(&self, id: &str, timeout: Duration) -> Result<()> {
        let id = checked_id(id)?;
        self.wait_for(&id, ReadinessRule::Healthy, timeout).await
    }

    async fn settle(&self, id: &str, wait: WaitPolicy) -> Result<()> {
        match wait {
            WaitPolicy::Return => Ok(()),
            WaitPolicy::SteadyState(timeout) => {
                self.wait_for(id, ReadinessRule::InstanceParity, timeout).await
            }
        }
    }

    async fn wait_for(&self, id: &str, rule: ReadinessRule, timeout: Duration) -> Result<()> {
        let budget = effective_timeout(timeout, self.default_timeout);
        self.reporter
            .step(&format!("waiting for {id} to converge (up to {}s)...", budget.as_secs()));
        tracing::info!(app = id, ?rule, timeout_secs = budget.as_secs_f64(), "waiting for convergence");

        let scheduler = &self.scheduler;
        let watcher = &self.watcher;
        let outcome = run_bounded(timeout, self.default_timeout, &self.cancel, |session| async move {
            watcher.watch(scheduler, id, rule, &session).await
        })
        .await;

        match outcome {
            Bounded::Completed(PollOutcome::Converged(app)) => {
                tracing::info!(app = id, tasks_running = app.tasks_running, "converged");
                self.reporter.success(&format!("{id} converged"));
                Ok(())
            }
            Bounded::Completed(PollOutcome::Expired) | Bounded::TimedOut => {
                self.reporter.warn(&format!("{id} did not converge in time"));
                Err(ConvergeError::Timeout {
                    id: id.to_string(),
                    timeout: budget,
                }
                .into())
            }
            Bounded::Completed(PollOutcome::Stopped) | Bounded::Cancelled => {
                self.reporter.warn(&format!("wait for {id} cancelled"));
                Err(ConvergeError::Cancelled(id.to_string()).into())
            }
        }
    }
}

/// Validate and normalise an id before it reaches the network.
fn checked_id(id: &str) -> Result<String, ConvergeError> {
    validate_app_id(id)?;
    Ok(normalize_app_id(id))
}
