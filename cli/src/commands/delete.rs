//! `converge delete <id>` — remove an application.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::commands::IdArgs;

/// Run `converge delete <id>`.
///
/// Prompts unless `--yes`, `CI`, or `CONVERGE_YES` is set.
///
/// # Errors
///
/// Returns an error if the prompt fails or the scheduler rejects the request.
pub async fn run(app: &AppContext, args: &IdArgs) -> Result<ExitCode> {
    if !app.non_interactive && !app.confirm(&format!("Delete application {}?", args.id), false)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let orch = app.orchestrator()?;
    let handle = orch.delete_application(&args.id).await?;
    app.renderer().render_deployment("delete", &args.id, &handle)?;
    Ok(ExitCode::SUCCESS)
}
