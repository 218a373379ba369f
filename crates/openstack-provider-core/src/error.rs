//! Error types for provider configuration
//!
//! Covers setting resolution, validation gates, client construction,
//! resource dispatch and the file formats explicit inputs are loaded from.

use thiserror::Error;

use crate::client::ClientError;

/// Main error type for provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No member of an identity group resolved to a non-empty value
    #[error("At least one of {} must be specified", .members.join(" or "))]
    MissingRequiredGroup {
        group: String,
        members: Vec<String>,
    },

    /// A required setting resolved to the empty string
    #[error("Required setting '{key}' is not set (set it explicitly or via {env_var})")]
    MissingRequiredSetting {
        key: String,
        env_var: String,
    },

    /// The client-construction collaborator failed
    #[error(transparent)]
    ClientConstruction(#[from] ClientError),

    /// A resource handler was registered twice under the same name
    #[error("Resource already registered: {0}")]
    DuplicateResource(String),

    /// No handler is registered under the requested name
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A resource handler reported a failure
    #[error("Resource {resource} failed: {message}")]
    Resource {
        resource: String,
        message: String,
    },

    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input bundle or dotenv parsing error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ProviderError::InvalidInput(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        ProviderError::Parse(msg.into())
    }

    /// Create a resource handler error
    pub fn resource(resource: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Resource {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Whether this error was caused by the supplied configuration
    /// rather than by the provider or its collaborators
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingRequiredGroup { .. }
                | ProviderError::MissingRequiredSetting { .. }
                | ProviderError::InvalidInput(_)
                | ProviderError::Parse(_)
                | ProviderError::Io(_)
        )
    }

    /// Whether this error came out of one of the validation gates
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingRequiredGroup { .. } | ProviderError::MissingRequiredSetting { .. }
        )
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for ProviderError {
    fn from(err: serde_yaml::Error) -> Self {
        ProviderError::Parse(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for ProviderError {
    fn from(err: toml::de::Error) -> Self {
        ProviderError::Parse(format!("TOML error: {}", err))
    }
}

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;
