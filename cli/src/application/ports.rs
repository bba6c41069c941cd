//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `converge_common` — never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;

use anyhow::Result;
use converge_common::{ApplicationDefinition, ApplicationState, ApplicationVersions, DeploymentId};

use crate::domain::config::ClientConfig;

// ── Catalog Port ──────────────────────────────────────────────────────────────

/// Read side of the scheduler's application catalog.
///
/// The catalog is eventually consistent: a freshly created application may
/// be missing from the listing for a while, and a listing may fail outright.
/// Implementations report a missing application as
/// [`ConvergeError::NotFound`](crate::domain::ConvergeError::NotFound) and
/// any other failure as
/// [`ConvergeError::Transient`](crate::domain::ConvergeError::Transient).
#[allow(async_fn_in_trait)]
pub trait ApplicationCatalog {
    /// Ids of every application the scheduler knows about.
    async fn list_application_ids(&self) -> Result<Vec<String>>;
    /// Full snapshot of a single application, tasks included.
    async fn fetch_application(&self, id: &str) -> Result<ApplicationState>;
    /// Every application, without task detail.
    async fn list_applications(&self) -> Result<Vec<ApplicationState>>;
    /// Version history of an application.
    async fn application_versions(&self, id: &str) -> Result<ApplicationVersions>;
}

// ── Submit Port ───────────────────────────────────────────────────────────────

/// Write side: every mutation returns as soon as the scheduler accepts it.
#[allow(async_fn_in_trait)]
pub trait DeploymentSubmitter {
    /// Create an application; the scheduler echoes the stored definition.
    async fn submit_create(&self, app: &ApplicationDefinition) -> Result<ApplicationState>;
    /// Replace an application's definition.
    async fn submit_update(&self, app: &ApplicationDefinition, force: bool) -> Result<DeploymentId>;
    /// Change the desired instance count.
    async fn submit_scale(&self, id: &str, instances: i64, force: bool) -> Result<DeploymentId>;
    /// Rolling restart of every task.
    async fn submit_restart(&self, id: &str, force: bool) -> Result<DeploymentId>;
    /// Remove an application.
    async fn submit_delete(&self, id: &str) -> Result<DeploymentId>;
    /// Roll an application back (or forward) to a recorded version.
    async fn submit_version(&self, id: &str, version: &str) -> Result<DeploymentId>;
}

/// Composite trait — any type implementing both halves is a `Scheduler`.
pub trait Scheduler: ApplicationCatalog + DeploymentSubmitter {}

/// Blanket implementation: any type implementing both halves is a `Scheduler`.
impl<T> Scheduler for T where T: ApplicationCatalog + DeploymentSubmitter {}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Persistent storage for the client configuration file.
pub trait ConfigStore {
    /// Load the stored configuration, or defaults if none exists.
    fn load(&self) -> Result<ClientConfig>;
    /// Persist the configuration.
    fn save(&self, config: &ClientConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

/// Reporter that discards everything, for library callers and `--quiet`.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
