//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Deploy applications to a container scheduler and wait for them to converge
#[derive(Parser)]
#[command(
    name = "converge",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Scheduler base URL (overrides config file and CONVERGE_ENDPOINT)
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List applications
    List,

    /// Show one application and its tasks
    Show(commands::IdArgs),

    /// Create an application from a JSON or YAML definition
    Deploy(commands::deploy::DeployArgs),

    /// Replace an application's definition
    Update(commands::deploy::UpdateArgs),

    /// Change an application's instance count
    Scale(commands::scale::ScaleArgs),

    /// Restart every task of an application
    Restart(commands::scale::RestartArgs),

    /// Remove an application
    Delete(commands::IdArgs),

    /// Wait until an application reaches steady state
    Wait(commands::wait::WaitArgs),

    /// Check whether every task passes its health checks
    Health(commands::IdArgs),

    /// List an application's recorded versions
    Versions(commands::IdArgs),

    /// Switch an application to a recorded version
    Rollback(commands::rollback::RollbackArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Execute the CLI command.
    ///
    /// `cancel` interrupts any convergence wait in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, cancel: CancellationToken) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            endpoint,
            yes,
            command,
            ..
        } = self;

        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
            endpoint,
        };
        let app = AppContext::new(&flags, cancel);

        match command {
            Command::List => commands::apps::list(&app).await,
            Command::Show(args) => commands::apps::show(&app, &args).await,
            Command::Versions(args) => commands::apps::versions(&app, &args).await,
            Command::Deploy(args) => commands::deploy::create(&app, &args).await,
            Command::Update(args) => commands::deploy::update(&app, &args).await,
            Command::Scale(args) => commands::scale::scale(&app, &args).await,
            Command::Restart(args) => commands::scale::restart(&app, &args).await,
            Command::Delete(args) => commands::delete::run(&app, &args).await,
            Command::Wait(args) => commands::wait::run(&app, &args).await,
            Command::Health(args) => commands::wait::health(&app, &args).await,
            Command::Rollback(args) => commands::rollback::run(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
        }
    }
}
