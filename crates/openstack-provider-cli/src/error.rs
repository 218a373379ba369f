//! Error types for the provider CLI

use openstack_provider_core::ProviderError;
use thiserror::Error;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Resolution, validation, input or client failure
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Output could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Output could not be written
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Serialization(format!("YAML error: {}", err))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
