//! Distributed campaign runner.
//!
//! A campaign executes many independent automaton runs across a fixed group
//! of ranks. Rank 0 coordinates: it validates and broadcasts the
//! configuration, takes its own share of runs, and folds every worker's
//! result batch into one aggregate. Given the same configuration the
//! aggregate is identical for any worker count that divides the run count.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Coordinator (rank 0)                   │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     RunConfig ── validate ── broadcast (CONFIG)    │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Partition: floor(runs / ranks) per rank        │ │
//! │  │     every rank runs its block with the engine      │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     ResultBatch (RESULTS) → check → fold stats     │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The protocol only needs a [`verdant_core::Transport`]; [`LocalNetwork`]
//! provides one backed by in-process channels, and [`run_local`] wires it up
//! with one thread per rank.

mod aggregator;
mod broadcast;
mod error;
mod network;
mod runner;

pub use aggregator::{
    classify, AggregateStats, Classification, ResultAggregator, StableAverages,
};
pub use broadcast::{announce, await_config, broadcast_config};
pub use error::CampaignError;
pub use network::{LocalEndpoint, LocalNetwork};
pub use runner::{
    execute_range, run_coordinator, run_local, run_rank, run_worker, CampaignSummary,
};
