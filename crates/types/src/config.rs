//! Run configuration shared by every rank of a campaign.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Largest accepted grid width or height.
pub const MAX_DIMENSION: u32 = 500;

/// Default step budget for a single run.
pub const DEFAULT_MAX_STEPS: u32 = 200;

/// Default number of consecutive unchanged steps that counts as converged.
pub const DEFAULT_MAX_UNCHANGED: u32 = 10;

/// How per-cell draws are derived from the base seed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SeedScheme {
    /// Five rounds of the minimal-standard multiplicative congruential
    /// generator over `base_seed * run + cell` in wrapping 32-bit
    /// arithmetic, matching historical campaigns. The base seed must fit in
    /// `i32`.
    #[default]
    MinimalStandard,

    /// Counter-based ChaCha8 stream keyed by the base seed.
    #[serde(rename = "chacha")]
    ChaCha,
}

impl fmt::Display for SeedScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedScheme::MinimalStandard => write!(f, "minimal-standard"),
            SeedScheme::ChaCha => write!(f, "chacha"),
        }
    }
}

/// Errors raised when a configuration is rejected.
///
/// A rejected configuration is never clamped into range; the coordinator
/// must obtain a new one before broadcasting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid {axis} of {value} exceeds the maximum of {max}")]
    DimensionTooLarge {
        axis: &'static str,
        value: u32,
        max: u32,
    },

    #[error("grid {axis} must be at least 1")]
    ZeroDimension { axis: &'static str },

    #[error("occupancy probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("total run count must be at least 1")]
    NoRuns,

    #[error("max steps must be at least 1")]
    ZeroMaxSteps,

    #[error("max unchanged steps must be at least 1")]
    ZeroMaxUnchanged,

    #[error("base seed {0} does not fit in 32 bits, as the minimal-standard scheme requires")]
    SeedOutOfRange(i64),
}

/// Immutable parameters of a campaign.
///
/// Built once by the coordinator, validated, then broadcast unchanged to
/// every rank. Nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct RunConfig {
    /// Grid extent along x (rows of the padded array).
    pub width: u32,

    /// Grid extent along y (columns of the padded array).
    pub height: u32,

    /// Probability that a cell starts vegetated.
    pub probability: f64,

    /// Number of runs requested for the whole campaign.
    pub total_runs: u64,

    /// Step budget per run.
    pub max_steps: u32,

    /// Consecutive unchanged steps after which a run is converged.
    pub max_unchanged: u32,

    /// Base seed combined with run and cell indices.
    pub base_seed: i64,

    /// Per-cell draw scheme.
    pub seed_scheme: SeedScheme,
}

impl RunConfig {
    /// Create a configuration with the default step budget and threshold.
    pub fn new(width: u32, height: u32, probability: f64, total_runs: u64, base_seed: i64) -> Self {
        Self {
            width,
            height,
            probability,
            total_runs,
            max_steps: DEFAULT_MAX_STEPS,
            max_unchanged: DEFAULT_MAX_UNCHANGED,
            base_seed,
            seed_scheme: SeedScheme::default(),
        }
    }

    /// Set the step budget.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the unchanged-step threshold.
    pub fn with_max_unchanged(mut self, max_unchanged: u32) -> Self {
        self.max_unchanged = max_unchanged;
        self
    }

    /// Set the seed scheme.
    pub fn with_seed_scheme(mut self, seed_scheme: SeedScheme) -> Self {
        self.seed_scheme = seed_scheme;
        self
    }

    /// Number of interior cells in one grid.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Upper bound on the vegetation total of any grid under this config.
    pub fn max_vegetation(&self) -> u64 {
        self.cell_count() * 10
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 {
                return Err(ConfigError::ZeroDimension { axis });
            }
            if value > MAX_DIMENSION {
                return Err(ConfigError::DimensionTooLarge {
                    axis,
                    value,
                    max: MAX_DIMENSION,
                });
            }
        }

        // NaN fails the range check too.
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.probability));
        }
        if self.total_runs == 0 {
            return Err(ConfigError::NoRuns);
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroMaxSteps);
        }
        if self.max_unchanged == 0 {
            return Err(ConfigError::ZeroMaxUnchanged);
        }
        if self.seed_scheme == SeedScheme::MinimalStandard
            && i32::try_from(self.base_seed).is_err()
        {
            return Err(ConfigError::SeedOutOfRange(self.base_seed));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new(3, 4, 0.5, 10, 7);
        assert_eq!(config.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(config.max_unchanged, DEFAULT_MAX_UNCHANGED);
        assert_eq!(config.seed_scheme, SeedScheme::MinimalStandard);
        assert_eq!(config.cell_count(), 12);
        assert_eq!(config.max_vegetation(), 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_grid_rejected_not_clamped() {
        let config = RunConfig::new(MAX_DIMENSION + 1, 10, 0.5, 1, 1);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DimensionTooLarge {
                axis: "width",
                value: 501,
                max: 500
            })
        );
        assert_eq!(config.width, 501);

        let config = RunConfig::new(10, 900, 0.5, 1, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DimensionTooLarge { axis: "height", .. })
        ));
    }

    #[test]
    fn test_boundary_dimensions_accepted() {
        assert!(RunConfig::new(MAX_DIMENSION, MAX_DIMENSION, 1.0, 1, 0)
            .validate()
            .is_ok());
        assert_eq!(
            RunConfig::new(0, 3, 0.5, 1, 1).validate(),
            Err(ConfigError::ZeroDimension { axis: "width" })
        );
    }

    #[test]
    fn test_probability_range() {
        assert!(RunConfig::new(3, 3, 0.0, 1, 1).validate().is_ok());
        assert!(matches!(
            RunConfig::new(3, 3, 1.5, 1, 1).validate(),
            Err(ConfigError::ProbabilityOutOfRange(_))
        ));
        assert!(matches!(
            RunConfig::new(3, 3, f64::NAN, 1, 1).validate(),
            Err(ConfigError::ProbabilityOutOfRange(_))
        ));
    }

    #[test]
    fn test_zero_counts_rejected() {
        assert_eq!(
            RunConfig::new(3, 3, 0.5, 0, 1).validate(),
            Err(ConfigError::NoRuns)
        );
        assert_eq!(
            RunConfig::new(3, 3, 0.5, 1, 1).with_max_steps(0).validate(),
            Err(ConfigError::ZeroMaxSteps)
        );
        assert_eq!(
            RunConfig::new(3, 3, 0.5, 1, 1)
                .with_max_unchanged(0)
                .validate(),
            Err(ConfigError::ZeroMaxUnchanged)
        );
    }

    #[test]
    fn test_historical_scheme_needs_32_bit_seed() {
        let seed = i64::from(i32::MAX) + 1;
        assert_eq!(
            RunConfig::new(3, 3, 0.5, 1, seed).validate(),
            Err(ConfigError::SeedOutOfRange(seed))
        );
        assert!(RunConfig::new(3, 3, 0.5, 1, i64::from(i32::MIN))
            .validate()
            .is_ok());
        assert!(RunConfig::new(3, 3, 0.5, 1, seed)
            .with_seed_scheme(SeedScheme::ChaCha)
            .validate()
            .is_ok());
    }
}
