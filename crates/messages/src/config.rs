//! Configuration broadcast.

use crate::{Tag, WireMessage};
use bincode::{Decode, Encode};
use verdant_types::RunConfig;

/// The coordinator's run configuration, sent to every other rank.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct ConfigAnnouncement {
    /// Configuration every rank runs with.
    pub config: RunConfig,
}

impl ConfigAnnouncement {
    /// Create a new announcement.
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Take the carried configuration.
    pub fn into_config(self) -> RunConfig {
        self.config
    }
}

impl WireMessage for ConfigAnnouncement {
    const TAG: Tag = Tag::CONFIG;

    fn type_name() -> &'static str {
        "ConfigAnnouncement"
    }
}
