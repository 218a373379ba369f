//! CLI module for the OpenStack provider
//!
//! Resolves provider settings from bundle files, `--set` overrides and the
//! environment, validates them, and optionally prepares an API client.

pub mod commands;
pub mod output;

pub use commands::{InputArgs, LogFormat, ProviderCli, ProviderCommands};
pub use output::OutputFormat;

use openstack_provider_core::ProviderError;

use crate::error::{CliError, Result};

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// Required setting or identity group missing
    ValidationFailed = 1,
    /// Invalid input or arguments
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Client construction failed
    ClientError = 6,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine the exit code for a failed command
    pub fn from_error(err: &CliError) -> Self {
        match err {
            CliError::Provider(e) => match e {
                ProviderError::MissingRequiredGroup { .. }
                | ProviderError::MissingRequiredSetting { .. } => ExitCode::ValidationFailed,
                ProviderError::InvalidInput(_) | ProviderError::Parse(_) => ExitCode::InvalidInput,
                ProviderError::Io(_) => ExitCode::FileError,
                ProviderError::ClientConstruction(_) => ExitCode::ClientError,
                _ => ExitCode::InternalError,
            },
            CliError::Serialization(_) | CliError::Output(_) => ExitCode::InternalError,
        }
    }
}

/// Run the CLI with the given arguments and return the exit code
pub fn run(cli: ProviderCli) -> Result<ExitCode> {
    match cli.command {
        ProviderCommands::Schema { format } => commands::execute_schema(format),
        ProviderCommands::Resolve { input, format } => commands::execute_resolve(&input, format),
        ProviderCommands::Validate { input, format } => commands::execute_validate(&input, format),
        ProviderCommands::Configure {
            input,
            timeout_secs,
            format,
        } => commands::execute_configure(&input, timeout_secs, format),
    }
}
