//! Domain-specific identifier types.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank of a worker within the fixed campaign group.
///
/// Ranks are dense, starting at zero. Rank zero is always the coordinator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode, Serialize, Deserialize,
)]
pub struct Rank(pub u32);

impl Rank {
    /// The rank that obtains the configuration and aggregates results.
    pub const COORDINATOR: Self = Rank(0);

    /// Whether this rank is the coordinator.
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }

    /// Rank as a `usize`, for indexing per-rank tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rank({})", self.0)
    }
}

/// Global, 1-based index of a run within a campaign.
///
/// Every run anywhere in the group has a distinct index; seed derivation
/// keys on it, so it must never be reused across ranks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Encode, Decode, Serialize, Deserialize,
)]
pub struct RunIndex(pub u64);

impl RunIndex {
    /// The first run of any campaign.
    pub const FIRST: Self = RunIndex(1);

    /// Get the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Run({})", self.0)
    }
}

/// Per-run unique index of a grid cell, `height * row + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex(pub u64);

impl CellIndex {
    /// Index of the interior cell at 1-based `(row, col)` in a grid of the given height.
    pub fn of(height: u32, row: u32, col: u32) -> Self {
        CellIndex(u64::from(height) * u64::from(row) + u64::from(col))
    }
}
