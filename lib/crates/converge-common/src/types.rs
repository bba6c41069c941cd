use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Collection wrapper returned by `GET /v2/apps`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Applications {
    #[serde(default)]
    pub apps: Vec<ApplicationState>,
}

/// Single-application wrapper returned by `GET /v2/apps/{id}`.
///
/// The scheduler answers `{"app": null}` for an application that is being
/// torn down, so the inner value is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationEnvelope {
    #[serde(default)]
    pub app: Option<ApplicationState>,
}

/// An application as observed on the scheduler.
///
/// Fields the client reasons about are typed; everything else (cmd, cpus,
/// container, ...) is carried through `definition` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    #[serde(default)]
    pub id: String,

    /// Desired instance count. Signed because that is what the wire carries;
    /// a negative value marks the snapshot as malformed.
    #[serde(default)]
    pub instances: i64,

    /// Running task count as reported by the scheduler. May legitimately
    /// disagree with `tasks.len()` for a poll or two.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tasks_running: i64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub tasks_staged: i64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub tasks_healthy: i64,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub tasks_unhealthy: i64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskState>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health_checks: Vec<HealthCheckSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployments: Vec<DeploymentRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(flatten)]
    pub definition: Map<String, Value>,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if passes by reference
fn is_zero(n: &i64) -> bool {
    *n == 0
}

impl ApplicationState {
    /// Whether every desired instance has a running task.
    ///
    /// A scaled-to-zero application is trivially satisfied; an application
    /// with no task list yet is not.
    #[must_use]
    pub fn all_tasks_running(&self) -> bool {
        if self.instances == 0 {
            return true;
        }
        if self.tasks.is_empty() {
            return false;
        }
        self.tasks_running == self.instances
    }

    #[must_use]
    pub fn has_health_checks(&self) -> bool {
        !self.health_checks.is_empty()
    }

    /// Deployment handles referenced by this snapshot.
    ///
    /// Entries without an `id` are skipped. Each handle carries the
    /// snapshot's version.
    #[must_use]
    pub fn deployment_ids(&self) -> Vec<DeploymentId> {
        self.deployments
            .iter()
            .filter_map(|d| d.id.as_ref())
            .map(|id| DeploymentId {
                deployment_id: id.clone(),
                version: self.version.clone().unwrap_or_default(),
            })
            .collect()
    }
}

/// An application definition as submitted by `deploy` or `update`.
///
/// Only the id is interpreted. `instances` stays optional so that a file
/// without it is sent without it, and the scheduler keeps its own default
/// (or the running count, on update). Everything else passes through
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDefinition {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<i64>,

    #[serde(flatten)]
    pub definition: Map<String, Value>,
}

/// A running or staged task belonging to an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskState {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staged_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// One slot per configured health check. A flapping task reports `null`
    /// for a slot, and a freshly started task may report fewer slots than
    /// there are checks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub health_check_results: Vec<Option<HealthCheckResult>>,
}

impl TaskState {
    /// Tri-state status of health-check slot `index`.
    ///
    /// Missing and `null` slots are both `Unknown`.
    #[must_use]
    pub fn health_status(&self, index: usize) -> HealthStatus {
        match self.health_check_results.get(index) {
            Some(Some(result)) => HealthStatus::from(result),
            Some(None) | None => HealthStatus::Unknown,
        }
    }
}

/// Latest outcome of one health check against one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    pub alive: bool,

    #[serde(default)]
    pub consecutive_failures: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_success: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_success: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Health of a single check slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Alive,
    NotAlive,
    Unknown,
}

impl From<&HealthCheckResult> for HealthStatus {
    fn from(result: &HealthCheckResult) -> Self {
        if result.alive {
            Self::Alive
        } else {
            Self::NotAlive
        }
    }
}

/// Health check configured on an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_index: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_consecutive_failures: Option<u32>,
}

/// Reference to an in-flight deployment inside an application snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Handle returned by every mutating call.
///
/// Correlates the mutation with cluster-side work, but the scheduler keeps
/// no success/failure history per deployment, so it cannot be used to
/// learn whether the deployment finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentId {
    #[serde(default)]
    pub deployment_id: String,
    #[serde(default)]
    pub version: String,
}

/// Version history of an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationVersions {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// Body for `PUT /v2/apps/{id}` when rolling back to a version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationVersion {
    pub version: String,
}

/// Body for a scale request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleRequest {
    pub id: String,
    pub instances: i64,
}

/// Body for a restart request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RestartRequest {
    pub force: bool,
}
