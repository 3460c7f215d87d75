//! Error types for configuration generation

use spoolsync_automation::AutomationError;
use thiserror::Error;

/// Errors that can occur while rendering generated configuration
///
/// Topology shape never causes an error; an empty topology renders an
/// empty result.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to serialize generated YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("generated an invalid automation: {0}")]
    Automation(#[from] AutomationError),
}

/// Result type for generation
pub type GeneratorResult<T> = Result<T, GeneratorError>;
