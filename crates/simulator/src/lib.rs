//! Verdant Simulator
//!
//! Front end for running vegetation campaigns on an in-process rank group.
//!
//! # Architecture
//!
//! The simulator builds on `verdant-simulation` to provide:
//!
//! - **Configuration**: builder-style setup, or a TOML file with command-line
//!   overrides
//! - **Execution**: one thread per rank over the local network
//! - **Reporting**: outcome percentages, stable-run averages and skipped-run
//!   accounting
//!
//! # Example
//!
//! ```ignore
//! use verdant_simulator::{Simulator, SimulatorConfig};
//! use verdant_types::RunConfig;
//!
//! let config = SimulatorConfig::new(RunConfig::new(50, 50, 0.3, 100, 12345))
//!     .with_workers(4);
//!
//! let report = Simulator::new(config).run()?;
//! report.print();
//! ```

pub mod config;
mod error;
pub mod report;
pub mod runner;

pub use config::{CampaignFile, SimulatorConfig, DEFAULT_WORKERS};
pub use error::SimulatorError;
pub use report::CampaignReport;
pub use runner::Simulator;
