//! Shared mock infrastructure for unit tests.
//!
//! Provides a scripted [`Scheduler`] and snapshot builders so each test file
//! doesn't have to re-define the same boilerplate.

#![allow(clippy::expect_used, clippy::unwrap_used, dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use converge_cli::application::{ApplicationCatalog, DeploymentSubmitter, ProgressReporter};
use converge_cli::domain::ConvergeError;
use converge_common::{
    ApplicationDefinition, ApplicationState, ApplicationVersions, DeploymentId, HealthCheckResult, HealthCheckSpec,
    TaskState,
};

// ── Snapshot builders ─────────────────────────────────────────────────────────

/// Application with `running` tasks and no health checks.
pub fn snapshot(id: &str, instances: i64, running: i64) -> ApplicationState {
    ApplicationState {
        id: id.to_string(),
        instances,
        tasks_running: running,
        tasks: (0..running)
            .map(|i| TaskState {
                id: format!("{}.{i}", id.trim_start_matches('/')),
                ..TaskState::default()
            })
            .collect(),
        ..ApplicationState::default()
    }
}

/// Give every task `checks` health-check slots, all set to `alive`.
pub fn with_checks(mut app: ApplicationState, checks: usize, alive: bool) -> ApplicationState {
    app.health_checks = vec![HealthCheckSpec::default(); checks];
    for task in &mut app.tasks {
        task.health_check_results = vec![
            Some(HealthCheckResult {
                alive,
                ..HealthCheckResult::default()
            });
            checks
        ];
    }
    app
}

// ── Mock: scripted scheduler ──────────────────────────────────────────────────

/// Serves snapshots in order; the last one repeats forever.
///
/// With a `list_delay`, every id listing hangs that long first, like a
/// scheduler that accepts the connection and then stalls.
#[derive(Default)]
pub struct ScriptedScheduler {
    ids: Vec<String>,
    list_delay: Duration,
    snapshots: Mutex<VecDeque<ApplicationState>>,
    submitted: Mutex<Vec<String>>,
    fetches: AtomicUsize,
}

impl ScriptedScheduler {
    pub fn new(ids: &[&str], snapshots: Vec<ApplicationState>) -> Self {
        Self {
            ids: ids.iter().map(ToString::to_string).collect(),
            snapshots: Mutex::new(snapshots.into()),
            ..Self::default()
        }
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = delay;
        self
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn record(&self, what: String) -> DeploymentId {
        self.submitted.lock().unwrap().push(what);
        DeploymentId {
            deployment_id: "dep-7".into(),
            version: "2026-03-01T12:00:00.000Z".into(),
        }
    }
}

impl ApplicationCatalog for ScriptedScheduler {
    async fn list_application_ids(&self) -> Result<Vec<String>> {
        if !self.list_delay.is_zero() {
            tokio::time::sleep(self.list_delay).await;
        }
        Ok(self.ids.clone())
    }
    async fn fetch_application(&self, id: &str) -> Result<ApplicationState> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.snapshots.lock().unwrap();
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        next.ok_or_else(|| ConvergeError::NotFound(id.to_string()).into())
    }
    async fn list_applications(&self) -> Result<Vec<ApplicationState>> {
        Ok(self.snapshots.lock().unwrap().iter().cloned().collect())
    }
    async fn application_versions(&self, _: &str) -> Result<ApplicationVersions> {
        Ok(ApplicationVersions::default())
    }
}

impl DeploymentSubmitter for ScriptedScheduler {
    async fn submit_create(&self, app: &ApplicationDefinition) -> Result<ApplicationState> {
        self.record(format!("create {} instances={:?}", app.id, app.instances));
        Ok(ApplicationState {
            id: app.id.clone(),
            instances: app.instances.unwrap_or(1),
            ..ApplicationState::default()
        })
    }
    async fn submit_update(&self, app: &ApplicationDefinition, force: bool) -> Result<DeploymentId> {
        Ok(self.record(format!("update {} force={force}", app.id)))
    }
    async fn submit_scale(&self, id: &str, instances: i64, force: bool) -> Result<DeploymentId> {
        Ok(self.record(format!("scale {id} {instances} force={force}")))
    }
    async fn submit_restart(&self, id: &str, force: bool) -> Result<DeploymentId> {
        Ok(self.record(format!("restart {id} force={force}")))
    }
    async fn submit_delete(&self, id: &str) -> Result<DeploymentId> {
        Ok(self.record(format!("delete {id}")))
    }
    async fn submit_version(&self, id: &str, version: &str) -> Result<DeploymentId> {
        Ok(self.record(format!("version {id} {version}")))
    }
}

// ── Mock: recording reporter ──────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ProgressReporter for &RecordingReporter {
    fn step(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("ok: {message}"));
    }
    fn warn(&self, message: &str) {
        self.lines.lock().unwrap().push(format!("warn: {message}"));
    }
}
