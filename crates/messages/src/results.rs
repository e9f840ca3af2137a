//! Result batch collection.

use crate::{Tag, WireMessage};
use bincode::{Decode, Encode};
use verdant_types::ResultBatch;

/// A worker's complete batch of run results.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ResultBatchMessage {
    /// Results in run-index order.
    pub batch: ResultBatch,
}

impl ResultBatchMessage {
    /// Create a new batch message.
    pub fn new(batch: ResultBatch) -> Self {
        Self { batch }
    }

    /// Take the carried batch.
    pub fn into_batch(self) -> ResultBatch {
        self.batch
    }
}

impl WireMessage for ResultBatchMessage {
    const TAG: Tag = Tag::RESULTS;

    fn type_name() -> &'static str {
        "ResultBatch"
    }
}
