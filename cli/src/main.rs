//! converge - deploy applications to a container scheduler and wait for them to converge

use std::process::ExitCode;

use clap::Parser;
use converge_cli::cli::Cli;
use converge_cli::domain::error_code;
use converge_cli::output::json;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Exit code after a second Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let json_mode = cli.json;
    let cancel = CancellationToken::new();
    let run = cli.run(cancel.clone());
    tokio::pin!(run);

    // First Ctrl-C cancels any wait and lets the command report it; a
    // second one exits immediately.
    let result = tokio::select! {
        result = &mut run => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::debug!("interrupt received, cancelling");
            cancel.cancel();
            tokio::select! {
                result = &mut run => result,
                _ = tokio::signal::ctrl_c() => std::process::exit(EXIT_INTERRUPTED),
            }
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            let code = error_code(&e);
            if json_mode {
                match json::format_error(&format!("{e:#}"), code) {
                    Ok(body) => println!("{body}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
