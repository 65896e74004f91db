//! Error types for the core crate.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for [`crate::WorkflowConfig`].
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config parsed but holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
