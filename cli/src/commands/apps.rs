//! `converge list`, `converge show <id>`, `converge versions <id>`.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::IdArgs;

/// Run `converge list`.
///
/// # Errors
///
/// Returns an error if the scheduler cannot be reached.
pub async fn list(app: &AppContext) -> Result<ExitCode> {
    let orch = app.orchestrator()?;
    let mut apps = orch.list_applications().await?;
    apps.sort_by(|a, b| a.id.cmp(&b.id));
    app.renderer().render_apps(&apps)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `converge show <id>`.
///
/// # Errors
///
/// Returns an error if the id is invalid, the application does not exist,
/// or the scheduler cannot be reached.
pub async fn show(app: &AppContext, args: &IdArgs) -> Result<ExitCode> {
    let orch = app.orchestrator()?;
    let state = orch.application(&args.id).await?;
    app.renderer().render_app(&state)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `converge versions <id>`.
///
/// # Errors
///
/// Returns an error if the id is invalid or the scheduler cannot be reached.
pub async fn versions(app: &AppContext, args: &IdArgs) -> Result<ExitCode> {
    let orch = app.orchestrator()?;
    let versions = orch.application_versions(&args.id).await?;
    app.renderer().render_versions(&args.id, &versions)?;
    Ok(ExitCode::SUCCESS)
}
