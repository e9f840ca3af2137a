//! Simulator entry point.

use crate::{CampaignReport, SimulatorConfig, SimulatorError};
use tracing::info;
use verdant_simulation::run_local;

/// Runs one campaign on an in-process rank group.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Execute the campaign and build its report.
    pub fn run(&self) -> Result<CampaignReport, SimulatorError> {
        info!(
            workers = self.config.workers,
            runs = self.config.run.total_runs,
            "Starting campaign"
        );
        let summary = run_local(self.config.run.clone(), self.config.workers)?;
        Ok(CampaignReport::new(summary))
    }
}
