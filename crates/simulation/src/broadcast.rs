//! One-shot configuration broadcast from the coordinator.
//!
//! This is the campaign's only barrier: no rank partitions or runs anything
//! until it holds the configuration.

use crate::CampaignError;
use tracing::{debug, info};
use verdant_core::MessageTransport;
use verdant_messages::ConfigAnnouncement;
use verdant_types::{Rank, RunConfig};

/// Validate `config` and send it to every other rank.
pub fn announce<T: MessageTransport>(
    transport: &mut T,
    config: &RunConfig,
) -> Result<(), CampaignError> {
    config.validate()?;

    let announcement = ConfigAnnouncement::new(config.clone());
    for peer in 1..transport.size() as u32 {
        transport.send_message(Rank(peer), &announcement)?;
    }

    info!(
        ranks = transport.size(),
        width = config.width,
        height = config.height,
        probability = config.probability,
        runs = config.total_runs,
        seed = config.base_seed,
        scheme = %config.seed_scheme,
        "Configuration broadcast"
    );
    Ok(())
}

/// Block until the coordinator's configuration arrives.
pub fn await_config<T: MessageTransport>(transport: &mut T) -> Result<RunConfig, CampaignError> {
    let announcement: ConfigAnnouncement = transport.recv_message(Rank::COORDINATOR)?;
    let config = announcement.into_config();
    config.validate()?;

    debug!(rank = %transport.rank(), "Configuration received");
    Ok(config)
}

/// Run the broadcast from whichever side this rank is on.
///
/// The coordinator must supply `config`; other ranks ignore theirs and take
/// the coordinator's.
pub fn broadcast_config<T: MessageTransport>(
    transport: &mut T,
    config: Option<RunConfig>,
) -> Result<RunConfig, CampaignError> {
    if transport.rank().is_coordinator() {
        let config = config.ok_or(CampaignError::MissingConfig)?;
        announce(transport, &config)?;
        Ok(config)
    } else {
        await_config(transport)
    }
}
