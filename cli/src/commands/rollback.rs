//! `converge rollback <id> <version>` — switch to a recorded version.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;

/// Arguments for `converge rollback`.
#[derive(Args)]
pub struct RollbackArgs {
    /// Application id
    pub id: String,

    /// Version timestamp as listed by `converge versions`
    #[arg(id = "version_ts", value_name = "VERSION")]
    pub version: String,
}

/// Run `converge rollback`.
///
/// # Errors
///
/// Returns an error if the version is not in the application's history or
/// the scheduler rejects the request.
pub async fn run(app: &AppContext, args: &RollbackArgs) -> Result<ExitCode> {
    let orch = app.orchestrator()?;
    let handle = orch.set_application_version(&args.id, &args.version).await?;
    app.renderer().render_deployment("rollback", &args.id, &handle)?;
    Ok(ExitCode::SUCCESS)
}
