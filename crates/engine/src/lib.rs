//! Vegetation automaton engine.
//!
//! Runs one stochastic cellular automaton from a seeded grid to a terminal
//! outcome. Cells hold vegetation levels in `0..=10` on a toroidal grid;
//! each generation a cell grows, shrinks, or holds depending on the
//! weighted sum of its eight neighbors.
//!
//! Nothing here knows about ranks or transports: a run is a pure function
//! of `(RunConfig, RunIndex, sampler)`.
//!
//! # Example
//!
//! ```ignore
//! use verdant_engine::{run_once, Sampler};
//! use verdant_types::{RunConfig, RunIndex};
//!
//! let config = RunConfig::new(50, 50, 0.3, 100, 12345);
//! let sampler = Sampler::new(config.seed_scheme, config.base_seed);
//! let report = run_once(&config, RunIndex(1), &sampler)?;
//! println!("{:?} after {} steps", report.outcome, report.result.steps);
//! ```

mod error;
pub mod grid;
mod life;
pub mod seed;

pub use error::EngineError;
pub use grid::{Grid, MAX_CELL_VALUE};
pub use life::{run_once, RunOutcome, RunReport, Simulation};
pub use seed::{CellSampler, ChaChaSampler, MinimalStandard, Sampler};
