//! `converge deploy <file>` and `converge update <file>`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use converge_common::ApplicationDefinition;

use crate::app::AppContext;
use crate::commands::WaitFlags;

/// Arguments for `converge deploy`.
#[derive(Args)]
pub struct DeployArgs {
    /// Application definition (`.json`, `.yaml`/`.yml`, or `-` for stdin)
    pub file: PathBuf,

    #[command(flatten)]
    pub wait: WaitFlags,
}

/// Arguments for `converge update`.
#[derive(Args)]
pub struct UpdateArgs {
    /// Application definition (`.json`, `.yaml`/`.yml`, or `-` for stdin)
    pub file: PathBuf,

    /// Override a deployment that is currently blocking the application
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub wait: WaitFlags,
}

/// Run `converge deploy`.
///
/// # Errors
///
/// Returns an error if the definition cannot be read, the scheduler rejects
/// it, or `--wait` does not converge.
pub async fn create(app: &AppContext, args: &DeployArgs) -> Result<ExitCode> {
    let definition = load_definition(&args.file)?;
    let orch = app.orchestrator()?;
    let created = orch.create_application(&definition, args.wait.policy()).await?;
    app.renderer().render_created(&created)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `converge update`.
///
/// # Errors
///
/// Returns an error if the definition cannot be read, the scheduler rejects
/// it, or `--wait` does not converge.
pub async fn update(app: &AppContext, args: &UpdateArgs) -> Result<ExitCode> {
    let definition = load_definition(&args.file)?;
    let orch = app.orchestrator()?;
    let handle = orch
        .update_application(&definition, args.force, args.wait.policy())
        .await?;
    app.renderer().render_deployment("update", &definition.id, &handle)?;
    Ok(ExitCode::SUCCESS)
}

/// Read an application definition. JSON is chosen by a `.json` extension;
/// anything else is parsed as YAML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_definition(path: &Path) -> Result<ApplicationDefinition> {
    let content = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("cannot read definition from stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?
    };
    parse_definition(&content, path.extension().is_some_and(|ext| ext == "json"))
        .with_context(|| format!("cannot parse {}", path.display()))
}

fn parse_definition(content: &str, json: bool) -> Result<ApplicationDefinition> {
    let app: ApplicationDefinition = if json {
        serde_json::from_str(content)?
    } else {
        serde_yaml::from_str(content)?
    };
    Ok(app)
}
