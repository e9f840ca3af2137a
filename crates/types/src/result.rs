//! Per-run results and the batches that carry them to the coordinator.

use crate::{Rank, RunIndex};
use bincode::{Decode, Encode};

/// Outcome of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
pub struct RunResult {
    /// Steps taken, counting the initial census as step 1.
    pub steps: u32,

    /// Vegetation total at the terminating census.
    pub vegetation: u64,
}

impl RunResult {
    /// Create a new run result.
    pub fn new(steps: u32, vegetation: u64) -> Self {
        Self { steps, vegetation }
    }
}

/// All results produced by one rank, in run-index order.
///
/// `results[i]` belongs to run `first_run + i`.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ResultBatch {
    /// Rank that executed the runs.
    pub rank: Rank,

    /// Global index of the first run in the batch.
    pub first_run: RunIndex,

    /// Results, one per run.
    pub results: Vec<RunResult>,
}

impl ResultBatch {
    /// Create an empty batch for runs starting at `first_run`.
    pub fn new(rank: Rank, first_run: RunIndex) -> Self {
        Self {
            rank,
            first_run,
            results: Vec::new(),
        }
    }

    /// Create an empty batch with room for `capacity` results.
    pub fn with_capacity(rank: Rank, first_run: RunIndex, capacity: usize) -> Self {
        Self {
            rank,
            first_run,
            results: Vec::with_capacity(capacity),
        }
    }

    /// Append the result of the next run.
    pub fn push(&mut self, result: RunResult) {
        self.results.push(result);
    }

    /// Number of results in the batch.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate results together with their global run index.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (RunIndex, &RunResult)> + '_ {
        self.results
            .iter()
            .enumerate()
            .map(move |(offset, result)| (RunIndex(self.first_run.0 + offset as u64), result))
    }
}
