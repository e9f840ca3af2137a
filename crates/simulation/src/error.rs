//! Campaign errors.

use thiserror::Error;
use verdant_core::TransportError;
use verdant_engine::EngineError;
use verdant_types::{ConfigError, PartitionError, Rank, RunIndex};

/// Errors that abort a campaign.
///
/// There is no partial report: any of these leaves the aggregate undefined.
#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("partition failed: {0}")]
    Partition(#[from] PartitionError),

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("engine failed: {0}")]
    Engine(#[from] EngineError),

    /// The coordinator was started without a configuration to broadcast.
    #[error("coordinator has no configuration to broadcast")]
    MissingConfig,

    /// A result batch arrived from a rank that must not send one.
    #[error("unexpected result batch from {sender}")]
    UnexpectedBatch { sender: Rank },

    /// A second result batch arrived from the same rank.
    #[error("duplicate result batch from {sender}")]
    DuplicateBatch { sender: Rank },

    /// The batch names a different rank than the one that sent it.
    #[error("batch from {sender} claims to be from {claimed}")]
    RankMismatch { sender: Rank, claimed: Rank },

    /// The batch does not cover the sender's partition range.
    #[error(
        "batch from {sender} covers {len} runs from {first}, expected {expected_len} from {expected_first}"
    )]
    BatchMismatch {
        sender: Rank,
        first: RunIndex,
        len: usize,
        expected_first: RunIndex,
        expected_len: u64,
    },

    /// A rank's thread panicked.
    #[error("{rank} panicked")]
    RankPanicked { rank: Rank },
}
