//! Configuration types for the simulator.

use crate::SimulatorError;
use serde::Deserialize;
use std::path::Path;
use verdant_types::{RunConfig, SeedScheme};

/// Default number of ranks when none is given.
pub const DEFAULT_WORKERS: u32 = 1;

/// Configuration for a campaign: what to run and on how many ranks.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorConfig {
    /// Configuration broadcast to every rank.
    pub run: RunConfig,

    /// Size of the rank group, coordinator included.
    pub workers: u32,
}

impl SimulatorConfig {
    /// Create a new simulator configuration on a single rank.
    pub fn new(run: RunConfig) -> Self {
        Self {
            run,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Set the number of ranks.
    pub fn with_workers(mut self, workers: u32) -> Self {
        self.workers = workers;
        self
    }

    /// Set the per-run step budget.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.run = self.run.with_max_steps(max_steps);
        self
    }

    /// Set the convergence threshold.
    pub fn with_max_unchanged(mut self, max_unchanged: u32) -> Self {
        self.run = self.run.with_max_unchanged(max_unchanged);
        self
    }

    /// Set the per-cell draw scheme.
    pub fn with_seed_scheme(mut self, scheme: SeedScheme) -> Self {
        self.run = self.run.with_seed_scheme(scheme);
        self
    }

    /// Load a campaign from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SimulatorError> {
        CampaignFile::load(path)?.into_config()
    }
}

/// Campaign parameters as written in a TOML file.
///
/// Every field is optional so that a file can be partial and the command
/// line can fill in or override the rest:
///
/// ```toml
/// width = 50
/// height = 50
/// probability = 0.3
/// runs = 100
/// seed = 12345
/// workers = 4
/// seed_scheme = "chacha"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignFile {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub probability: Option<f64>,
    pub runs: Option<u64>,
    pub seed: Option<i64>,
    pub workers: Option<u32>,
    pub max_steps: Option<u32>,
    pub max_unchanged: Option<u32>,
    pub seed_scheme: Option<SeedScheme>,
}

impl CampaignFile {
    /// Read and parse a file.
    pub fn load(path: &Path) -> Result<Self, SimulatorError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| SimulatorError::ReadConfig {
                path: path.to_path_buf(),
                source,
            })?;
        toml::from_str(&contents).map_err(|source| SimulatorError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `overrides` on top of this file; set fields in `overrides`
    /// win.
    pub fn merge(self, overrides: CampaignFile) -> Self {
        Self {
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            probability: overrides.probability.or(self.probability),
            runs: overrides.runs.or(self.runs),
            seed: overrides.seed.or(self.seed),
            workers: overrides.workers.or(self.workers),
            max_steps: overrides.max_steps.or(self.max_steps),
            max_unchanged: overrides.max_unchanged.or(self.max_unchanged),
            seed_scheme: overrides.seed_scheme.or(self.seed_scheme),
        }
    }

    /// Resolve into a validated configuration.
    pub fn into_config(self) -> Result<SimulatorConfig, SimulatorError> {
        let mut run = RunConfig::new(
            self.width.ok_or(SimulatorError::MissingParameter("width"))?,
            self.height.ok_or(SimulatorError::MissingParameter("height"))?,
            self.probability
                .ok_or(SimulatorError::MissingParameter("probability"))?,
            self.runs.ok_or(SimulatorError::MissingParameter("runs"))?,
            self.seed.ok_or(SimulatorError::MissingParameter("seed"))?,
        );
        if let Some(max_steps) = self.max_steps {
            run = run.with_max_steps(max_steps);
        }
        if let Some(max_unchanged) = self.max_unchanged {
            run = run.with_max_unchanged(max_unchanged);
        }
        if let Some(scheme) = self.seed_scheme {
            run = run.with_seed_scheme(scheme);
        }
        run.validate()?;

        Ok(SimulatorConfig::new(run).with_workers(self.workers.unwrap_or(DEFAULT_WORKERS)))
    }
}
