//! Readiness aggregation over application snapshots.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! All functions take a snapshot in and return a verdict out.

use converge_common::{ApplicationState, HealthStatus};
use serde::Serialize;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Whether an application snapshot satisfies a readiness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessVerdict {
    Ready,
    NotReady,
    /// The snapshot violates its own invariants and cannot be judged.
    Error,
}

impl ReadinessVerdict {
    #[must_use]
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

/// Which property a wait converges on.
///
/// Deployment waits use `InstanceParity`; only the explicit health query
/// requires every health check to be green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadinessRule {
    /// Running task count matches the desired instance count.
    #[default]
    InstanceParity,
    /// Instance parity plus every health-check slot of every task alive.
    Healthy,
}

impl ReadinessRule {
    #[must_use]
    pub fn apply(self, app: &ApplicationState) -> ReadinessVerdict {
        match self {
            Self::InstanceParity => instance_parity(app),
            Self::Healthy => evaluate(app),
        }
    }
}

// ── Pure functions ────────────────────────────────────────────────────────────

/// Instance-count parity: rules shared by both readiness checks.
///
/// `tasks_running` is taken from the snapshot rather than recounted; the two
/// may disagree transiently and the scheduler's count is authoritative.
#[must_use]
pub fn instance_parity(app: &ApplicationState) -> ReadinessVerdict {
    if app.instances < 0 || app.tasks_running < 0 {
        return ReadinessVerdict::Error;
    }
    if app.instances == 0 {
        return ReadinessVerdict::Ready;
    }
    if app.tasks.is_empty() {
        return ReadinessVerdict::NotReady;
    }
    if app.tasks_running != app.instances {
        return ReadinessVerdict::NotReady;
    }
    ReadinessVerdict::Ready
}

/// Full readiness: instance parity, then every configured health check of
/// every task must be `Alive`.
///
/// A single `NotAlive` or `Unknown` slot anywhere fails the verdict. A task
/// that reports fewer results than there are configured checks counts the
/// missing slots as `Unknown`; results beyond the configured checks are
/// judged too.
#[must_use]
pub fn evaluate(app: &ApplicationState) -> ReadinessVerdict {
    let parity = instance_parity(app);
    if !parity.is_ready() || app.instances == 0 {
        return parity;
    }
    if !app.has_health_checks() {
        return ReadinessVerdict::Ready;
    }
    let checks = app.health_checks.len();
    let all_alive = app.tasks.iter().all(|task| {
        let slots = checks.max(task.health_check_results.len());
        (0..slots).all(|slot| task.health_status(slot) == HealthStatus::Alive)
    });
    if all_alive {
        ReadinessVerdict::Ready
    } else {
        ReadinessVerdict::NotReady
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
