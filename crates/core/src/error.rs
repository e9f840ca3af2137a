//! Transport errors.

use thiserror::Error;
use verdant_messages::{CodecError, Tag};
use verdant_types::Rank;

/// Errors raised at the transport boundary.
///
/// Every variant is fatal for a campaign: a lost message leaves the
/// aggregate undefined, and runs are never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer's endpoint is gone; nothing more will arrive from or reach it.
    #[error("{peer} disconnected")]
    Disconnected { peer: Rank },

    /// Every other endpoint is gone while waiting for `tag` from any sender.
    #[error("all peers disconnected while waiting for {tag}")]
    GroupDisconnected { tag: Tag },

    /// Addressed a rank outside the group.
    #[error("{rank} is outside a group of {size} ranks")]
    InvalidRank { rank: Rank, size: usize },

    /// The payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}
