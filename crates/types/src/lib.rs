//! Core types for Verdant campaigns.
//!
//! Everything here is plain data shared by every rank: the immutable
//! [`RunConfig`], the per-run [`RunResult`] and the [`ResultBatch`] a rank
//! ships to the coordinator, and the static [`Partition`] of run indices.

mod config;
mod identifiers;
mod partition;
mod result;

pub use config::{
    ConfigError, RunConfig, SeedScheme, DEFAULT_MAX_STEPS, DEFAULT_MAX_UNCHANGED, MAX_DIMENSION,
};
pub use identifiers::{CellIndex, Rank, RunIndex};
pub use partition::{Partition, PartitionError, RunRange};
pub use result::{ResultBatch, RunResult};
