//! Static partitioning of a campaign's runs across a fixed group of ranks.

use crate::{Rank, RunIndex};
use std::ops::Range;
use thiserror::Error;

/// Errors that can occur while partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("{rank} is outside a group of {workers} workers")]
    RankOutOfRange { rank: Rank, workers: u32 },
}

/// Contiguous block of global run indices owned by one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRange {
    /// First global index (1-based).
    pub first: RunIndex,

    /// Number of runs in the block.
    pub len: u64,
}

impl RunRange {
    /// Global index of the `local`-th run in this block.
    pub fn global(&self, local: u64) -> RunIndex {
        debug_assert!(local < self.len, "local index {local} outside range");
        RunIndex(self.first.0 + local)
    }

    /// Half-open range of raw global indices.
    pub fn indices(&self) -> Range<u64> {
        self.first.0..self.first.0 + self.len
    }

    /// Iterate the global run indices in order.
    pub fn iter(&self) -> impl Iterator<Item = RunIndex> {
        self.indices().map(RunIndex)
    }

    /// Check if the block is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Even split of `total_runs` across `workers` ranks.
///
/// Every rank gets `floor(total_runs / workers)` runs. The remainder is not
/// scheduled anywhere; [`Partition::skipped`] reports it so callers can
/// surface the loss instead of absorbing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    total_runs: u64,
    workers: u32,
    runs_per_worker: u64,
}

impl Partition {
    /// Partition `total_runs` across `workers` ranks.
    pub fn new(total_runs: u64, workers: u32) -> Result<Self, PartitionError> {
        if workers == 0 {
            return Err(PartitionError::NoWorkers);
        }
        Ok(Self {
            total_runs,
            workers,
            runs_per_worker: total_runs / u64::from(workers),
        })
    }

    /// Runs requested.
    pub fn total_runs(&self) -> u64 {
        self.total_runs
    }

    /// Ranks in the group.
    pub fn workers(&self) -> u32 {
        self.workers
    }

    /// Runs assigned to each rank.
    pub fn runs_per_worker(&self) -> u64 {
        self.runs_per_worker
    }

    /// Runs that will actually execute across the group.
    pub fn scheduled(&self) -> u64 {
        self.runs_per_worker * u64::from(self.workers)
    }

    /// Runs lost to the remainder, `total_runs mod workers`.
    pub fn skipped(&self) -> u64 {
        self.total_runs - self.scheduled()
    }

    /// The block of runs owned by `rank`.
    pub fn range_for(&self, rank: Rank) -> Result<RunRange, PartitionError> {
        if rank.0 >= self.workers {
            return Err(PartitionError::RankOutOfRange {
                rank,
                workers: self.workers,
            });
        }
        Ok(RunRange {
            first: RunIndex(u64::from(rank.0) * self.runs_per_worker + 1),
            len: self.runs_per_worker,
        })
    }

    /// Iterate every rank with its block, in rank order.
    pub fn ranges(&self) -> impl Iterator<Item = (Rank, RunRange)> + '_ {
        (0..self.workers).map(move |r| {
            let rank = Rank(r);
            let range = RunRange {
                first: RunIndex(u64::from(r) * self.runs_per_worker + 1),
                len: self.runs_per_worker,
            };
            (rank, range)
        })
    }
}
