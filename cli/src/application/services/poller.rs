//! Convergence polling against the eventually consistent catalog.
//!
//! The scheduler keeps no per-deployment success history, so the only way
//! to learn that a deployment finished is to watch the application until a
//! readiness rule holds. [`ConvergenceWatcher`] is the seam; the polling
//! strategy in [`ConvergencePoller`] is the one implementation today.

use std::time::Duration;

use anyhow::Result;
use converge_common::{ApplicationState, same_app};

use crate::application::ports::ApplicationCatalog;
use crate::application::services::deadline::PollSession;
use crate::domain::config::DEFAULT_POLL_INTERVAL_MS;
use crate::domain::health::{ReadinessRule, ReadinessVerdict};

/// Why a watch stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The rule held for this snapshot.
    Converged(ApplicationState),
    /// The session was told to stop.
    Stopped,
    /// The session deadline passed before the rule held.
    Expired,
}

/// Something that can tell when an application satisfies a readiness rule.
#[allow(async_fn_in_trait)]
pub trait ConvergenceWatcher {
    /// Watch `id` until `rule` holds or `session` ends.
    async fn watch(
        &self,
        catalog: &impl ApplicationCatalog,
        id: &str,
        rule: ReadinessRule,
        session: &PollSession,
    ) -> PollOutcome;
}

/// Fixed-cadence poller.
///
/// Each attempt lists application ids, fetches the snapshot when the id is
/// present, and applies the rule. Failed requests are logged and retried on
/// the next tick; the interval is constant.
#[derive(Debug, Clone, Copy)]
pub struct ConvergencePoller {
    interval: Duration,
}

impl Default for ConvergencePoller {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }
}

impl ConvergencePoller {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl ConvergenceWatcher for ConvergencePoller {
    async fn watch(
        &self,
        catalog: &impl ApplicationCatalog,
        id: &str,
        rule: ReadinessRule,
        session: &PollSession,
    ) -> PollOutcome {
        let mut attempt: u64 = 0;
        while !session.is_stopped() {
            if session.is_expired() {
                tracing::debug!(app = id, attempt, "poll deadline reached");
                return PollOutcome::Expired;
            }
            attempt = attempt.saturating_add(1);

            match fetch_snapshot(catalog, id).await {
                Ok(Some(app)) => match rule.apply(&app) {
                    ReadinessVerdict::Ready => {
                        tracing::debug!(app = id, attempt, ?rule, "converged");
                        session.finish();
                        return PollOutcome::Converged(app);
                    }
                    ReadinessVerdict::NotReady => tracing::debug!(
                        app = id,
                        attempt,
                        instances = app.instances,
                        tasks_running = app.tasks_running,
                        "not converged yet"
                    ),
                    ReadinessVerdict::Error => tracing::warn!(
                        app = id,
                        attempt,
                        instances = app.instances,
                        tasks_running = app.tasks_running,
                        "ignoring malformed snapshot"
                    ),
                },
                Ok(None) => tracing::debug!(app = id, attempt, "not listed yet"),
                Err(e) => tracing::debug!(app = id, attempt, error = %e, "poll attempt failed"),
            }

            session.pause(self.interval).await;
        }
        session.finish();
        PollOutcome::Stopped
    }
}

/// One existence check plus fetch. `Ok(None)` means "not listed".
async fn fetch_snapshot(catalog: &impl ApplicationCatalog, id: &str) -> Result<Option<ApplicationState>> {
    let ids = catalog.list_application_ids().await?;
    if !ids.iter().any(|known| same_app(known, id)) {
        return Ok(None);
    }
    catalog.fetch_application(id).await.map(Some)
}
