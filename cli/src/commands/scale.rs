//! `converge scale <id> <n>` and `converge restart <id>`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::commands::WaitFlags;

/// Arguments for `converge scale`.
#[derive(Args)]
pub struct ScaleArgs {
    /// Application id
    pub id: String,

    /// Desired instance count
    pub instances: u32,

    /// Override a deployment that is currently blocking the application
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub wait: WaitFlags,
}

/// Arguments for `converge restart`.
#[derive(Args)]
pub struct RestartArgs {
    /// Application id
    pub id: String,

    /// Override a deployment that is currently blocking the application
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub wait: WaitFlags,
}

/// Run `converge scale`.
///
/// # Errors
///
/// Returns an error if the request is rejected or `--wait` does not converge.
pub async fn scale(app: &AppContext, args: &ScaleArgs) -> Result<ExitCode> {
    let orch = app.orchestrator()?;
    let handle = orch
        .scale_application(&args.id, i64::from(args.instances), args.force, args.wait.policy())
        .await?;
    app.renderer().render_deployment("scale", &args.id, &handle)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `converge restart`.
///
/// # Errors
///
/// Returns an error if the request is rejected or `--wait` does not converge.
pub async fn restart(app: &AppContext, args: &RestartArgs) -> Result<ExitCode> {
    let orch = app.orchestrator()?;
    let handle = orch
        .restart_application(&args.id, args.force, args.wait.policy())
        .await?;
    app.renderer().render_deployment("restart", &args.id, &handle)?;
    Ok(ExitCode::SUCCESS)
}
