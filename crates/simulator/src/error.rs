use std::path::PathBuf;
use thiserror::Error;
use verdant_simulation::CampaignError;
use verdant_types::ConfigError;

/// Errors from loading a campaign or running it.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("failed to read {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required parameter was given neither in the file nor on the
    /// command line.
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Campaign(#[from] CampaignError),
}
