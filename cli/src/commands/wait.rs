//! `converge wait <id>` and `converge health <id>`.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::commands::IdArgs;

/// Arguments for `converge wait`.
#[derive(Args)]
pub struct WaitArgs {
    /// Application id
    pub id: String,

    /// Wait budget in seconds (0 uses the configured default)
    #[arg(long, value_name = "SECS", default_value_t = 0)]
    pub timeout: u64,

    /// Also require every health check of every task to pass
    #[arg(long)]
    pub healthy: bool,
}

/// Run `converge wait`.
///
/// # Errors
///
/// Returns an error on timeout, on Ctrl-C, or for an invalid id.
pub async fn run(app: &AppContext, args: &WaitArgs) -> Result<ExitCode> {
    let orch = app.orchestrator()?;
    let timeout = Duration::from_secs(args.timeout);
    if args.healthy {
        orch.wait_until_healthy(&args.id, timeout).await?;
    } else {
        orch.wait_for_steady_state(&args.id, timeout).await?;
    }
    app.renderer().render_converged(&args.id)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `converge health`. Exits non-zero when the application is not healthy.
///
/// # Errors
///
/// Returns an error if the application does not exist, its snapshot is
/// malformed, or the scheduler cannot be reached.
pub async fn health(app: &AppContext, args: &IdArgs) -> Result<ExitCode> {
    let orch = app.orchestrator()?;
    let healthy = orch.is_application_healthy(&args.id).await?;
    app.renderer().render_health(&args.id, healthy)?;
    Ok(if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
