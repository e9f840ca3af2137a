//! Error types for the engine.

use thiserror::Error;
use verdant_types::ConfigError;

/// Errors raised before a run starts.
///
/// Once a run has started it cannot fail: every outcome, including never
/// settling, is a classification rather than an error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configuration was rejected.
    #[error("invalid run configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
