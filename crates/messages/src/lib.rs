//! Wire messages for the campaign protocol.
//!
//! The protocol has exactly two messages:
//!
//! - [`ConfigAnnouncement`]: coordinator → every worker, once, before any run.
//! - [`ResultBatchMessage`]: every worker → coordinator, once, after its runs.
//!
//! Each message type is bound to a fixed [`Tag`] so receivers can match on
//! (source, tag) the way a message-passing runtime does.

pub mod codec;
mod config;
mod results;

pub use codec::{decode_message, encode_message, CodecError};
pub use config::ConfigAnnouncement;
pub use results::ResultBatchMessage;

use bincode::{Decode, Encode};
use std::fmt;

/// Small integer label carried by every transported payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u8);

impl Tag {
    /// Configuration broadcast.
    pub const CONFIG: Self = Tag(1);

    /// Result batch collection.
    pub const RESULTS: Self = Tag(2);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.0)
    }
}

/// A message that can cross the transport boundary.
pub trait WireMessage: Encode + Decode<()> + Sized {
    /// Tag the message is sent under.
    const TAG: Tag;

    /// Human-readable name, for logs.
    fn type_name() -> &'static str;
}
