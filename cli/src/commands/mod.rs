//! Command implementations

pub mod apps;
pub mod config;
pub mod delete;
pub mod deploy;
pub mod rollback;
pub mod scale;
pub mod wait;

use std::time::Duration;

use clap::Args;

use crate::application::WaitPolicy;

/// A single application id.
#[derive(Args)]
pub struct IdArgs {
    /// Application id, e.g. `/web-1` (the leading slash is optional)
    pub id: String,
}

/// `--wait` / `--timeout` shared by every mutating command.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WaitFlags {
    /// Block until running tasks match the desired instance count
    #[arg(long)]
    pub wait: bool,

    /// Wait budget in seconds (implies --wait; 0 uses the configured default)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl WaitFlags {
    #[must_use]
    pub fn policy(&self) -> WaitPolicy {
        WaitPolicy::from_flags(self.wait, self.timeout.map(Duration::from_secs))
    }
}
