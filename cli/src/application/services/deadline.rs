//! Bounded, cancellable execution of a convergence wait.
//!
//! [`run_bounded`] races a unit of work against a wall-clock deadline and an
//! external [`CancellationToken`]. The work receives a [`PollSession`] and
//! checks it between attempts. When a limit wins, the work is dropped at its
//! current await point, so a request in flight never holds the caller past
//! the deadline.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const RUNNING: u8 = 0;
const CANCEL_REQUESTED: u8 = 1;
const STOPPED: u8 = 2;

/// Lifecycle of a poll session. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    CancelRequested,
    Stopped,
}

/// Per-wait state shared between the caller and the poll loop.
///
/// Cloning shares the same flag. The flag is written at most twice
/// (running → cancel-requested → stopped) and only read otherwise, so no
/// lock is involved.
#[derive(Debug, Clone)]
pub struct PollSession {
    state: Arc<AtomicU8>,
    wake: CancellationToken,
    deadline: Instant,
}

impl PollSession {
    #[must_use]
    pub fn new(deadline: Instant) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(RUNNING)),
            wake: CancellationToken::new(),
            deadline,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match self.state.load(Ordering::Acquire) {
            RUNNING => SessionState::Running,
            CANCEL_REQUESTED => SessionState::CancelRequested,
            _ => SessionState::Stopped,
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// True once a stop has been requested or acknowledged.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state() != SessionState::Running
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Ask the worker to stop. Returns `true` only for the call that
    /// actually delivered the request.
    pub fn request_stop(&self) -> bool {
        let delivered = self
            .state
            .compare_exchange(RUNNING, CANCEL_REQUESTED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if delivered {
            self.wake.cancel();
        }
        delivered
    }

    /// Mark the session finished from the worker side.
    pub fn finish(&self) {
        self.state.store(STOPPED, Ordering::Release);
    }

    /// Sleep between attempts, returning early if a stop is requested.
    pub async fn pause(&self, interval: Duration) {
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = self.wake.cancelled() => {}
        }
    }
}

/// How a bounded run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bounded<T> {
    /// The work returned on its own before either limit fired.
    Completed(T),
    /// The deadline elapsed first.
    TimedOut,
    /// The external token was cancelled first.
    Cancelled,
}

/// Resolve the wait budget: a zero timeout means "use the configured default".
#[must_use]
pub fn effective_timeout(timeout: Duration, default_timeout: Duration) -> Duration {
    if timeout.is_zero() {
        default_timeout
    } else {
        timeout
    }
}

/// Deadline `budget` from now. A budget too large to represent is clamped
/// to a far-future instant instead of overflowing.
#[must_use]
pub fn deadline_after(budget: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(budget)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Roughly thirty years.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Run `work` until it completes, `timeout` elapses, or `cancel` fires.
///
/// Exactly one of the three decides the outcome. When a limit wins, the
/// session is told to stop and the work future is dropped without being
/// polled again; the caller returns at once even if the work was parked on
/// a slow request. A cancellation that arrives before the deadline is
/// reported as [`Bounded::Cancelled`], never as a timeout.
pub async fn run_bounded<F, Fut, T>(
    timeout: Duration,
    default_timeout: Duration,
    cancel: &CancellationToken,
    work: F,
) -> Bounded<T>
where
    F: FnOnce(PollSession) -> Fut,
    Fut: Future<Output = T>,
{
    let budget = effective_timeout(timeout, default_timeout);
    let session = PollSession::new(deadline_after(budget));
    let deadline = session.deadline();

    let work = work(session.clone());
    tokio::pin!(work);

    let outcome = tokio::select! {
        biased;
        out = &mut work => return Bounded::Completed(out),
        () = cancel.cancelled() => Bounded::Cancelled,
        () = tokio::time::sleep_until(deadline) => Bounded::TimedOut,
    };

    session.request_stop();
    outcome
}
