//! Terminal stylesheet, built on owo-colors `Style` values.
//!
//! Every field is a no-op style until [`Styles::colorize`] runs, so
//! `--no-color` and `NO_COLOR` only have to skip that call.

use converge_common::HealthStatus;
use owo_colors::Style;

use crate::domain::health::ReadinessVerdict;

#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` lines and ready applications.
    pub success: Style,
    /// `⚠` lines and applications still converging.
    pub warning: Style,
    /// `✗` lines, failing checks and malformed snapshots.
    pub error: Style,
    /// `ℹ` lines and in-flight steps.
    pub info: Style,
    /// Table headings, key labels, unknown check results.
    pub dim: Style,
    pub bold: Style,
    /// Application ids used as section titles.
    pub header: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red().bold();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
    }

    /// Style for an application's readiness verdict.
    #[must_use]
    pub fn verdict(&self, verdict: ReadinessVerdict) -> Style {
        match verdict {
            ReadinessVerdict::Ready => self.success,
            ReadinessVerdict::NotReady => self.warning,
            ReadinessVerdict::Error => self.error,
        }
    }

    /// Style for a single health-check result.
    #[must_use]
    pub fn health(&self, status: HealthStatus) -> Style {
        match status {
            HealthStatus::Alive => self.success,
            HealthStatus::NotAlive => self.error,
            HealthStatus::Unknown => self.dim,
        }
    }
}
