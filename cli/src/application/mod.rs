//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;

pub use ports::{
    ApplicationCatalog, ConfigStore, DeploymentSubmitter, ProgressReporter, Scheduler,
    SilentReporter,
};
pub use services::deadline::{Bounded, PollSession, SessionState, run_bounded};
pub use services::orchestrator::{DeploymentOrchestrator, WaitPolicy};
pub use services::poller::{ConvergencePoller, ConvergenceWatcher, PollOutcome};
