//! CLI command definitions for the provider
//!
//! Provides Clap-based commands for inspecting the settings schema,
//! resolving and validating settings, and preparing an API client.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use openstack_provider_core::{
    EnvSnapshot, HttpClientFactory, Inputs, OpenStackClient, Provider, ResourceRegistry,
};

use super::output::{ConfigureOutput, OutputFormat, ResolveOutput, SchemaOutput};
use super::ExitCode;
use crate::error::{CliError, Result};

/// OpenStack provider CLI
///
/// Resolve, validate and inspect OpenStack provider configuration.
#[derive(Parser, Debug)]
#[command(name = "os-provider")]
#[command(about = "OpenStack provider - resolve and validate provider configuration", long_about = None)]
#[command(version)]
pub struct ProviderCli {
    /// Output verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format (logs go to stderr)
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: ProviderCommands,
}

/// Log output formats
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Where explicit settings and the environment come from
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Config bundle with explicit settings (.json, .toml, .yaml, .yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Explicit setting override, may be repeated (key=value)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// .env file filling variables missing from the process environment
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Ignore the process environment
    #[arg(long)]
    pub no_env: bool,
}

/// Available provider commands
#[derive(Subcommand, Debug)]
pub enum ProviderCommands {
    /// List settings, their environment variables and defaults
    Schema {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Resolve every setting and show where each value came from
    ///
    /// Secret values are redacted. Exits non-zero when validation fails.
    Resolve {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Check required settings and identity groups
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Run the full activation and prepare an API client
    ///
    /// Checks the identity endpoint and API versions without contacting
    /// the cloud.
    Configure {
        #[command(flatten)]
        input: InputArgs,

        /// HTTP request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

fn provider() -> Provider<OpenStackClient> {
    Provider::new(ResourceRegistry::new())
}

/// Collect explicit inputs and the environment snapshot from CLI arguments
pub fn load_sources(provider: &Provider<OpenStackClient>, args: &InputArgs) -> Result<(Inputs, EnvSnapshot)> {
    let mut inputs = match &args.config {
        Some(path) => Inputs::from_file(path)?,
        None => Inputs::new(),
    };

    let mut overrides = Inputs::new();
    for assignment in &args.set {
        overrides.apply_assignment(assignment)?;
    }
    inputs = inputs.merge(overrides);

    let mut env = if args.no_env {
        EnvSnapshot::new()
    } else {
        provider.capture_env()
    };
    if let Some(path) = &args.env_file {
        env = env.fill_from(EnvSnapshot::from_dotenv_file(path)?);
    }

    tracing::debug!(inputs = inputs.len(), env_vars = env.len(), "Collected setting sources");
    Ok((inputs, env))
}

/// Resolve settings and capture the validation verdict
fn resolve_output(args: &InputArgs) -> Result<ResolveOutput> {
    let provider = provider();
    let (inputs, env) = load_sources(&provider, args)?;

    let resolved = openstack_provider_core::resolve(&inputs, provider.schema(), &env);
    let verdict = openstack_provider_core::validate_required(&resolved, provider.schema())
        .and_then(|_| openstack_provider_core::validate_exclusive_groups(&resolved, provider.groups()));

    let error = match verdict {
        Ok(()) => None,
        Err(e) if e.is_validation_error() => Some(e.to_string()),
        Err(e) => return Err(CliError::from(e)),
    };
    Ok(ResolveOutput::new(&resolved, error))
}

fn exit_code_for(output: &ResolveOutput) -> ExitCode {
    if output.valid {
        ExitCode::Success
    } else {
        ExitCode::ValidationFailed
    }
}

/// Execute the schema command
pub fn execute_schema(format: OutputFormat) -> Result<ExitCode> {
    let provider = provider();
    SchemaOutput::new(provider.schema(), provider.groups()).render(format)?;
    Ok(ExitCode::Success)
}

/// Execute the resolve command
pub fn execute_resolve(args: &InputArgs, format: OutputFormat) -> Result<ExitCode> {
    let output = resolve_output(args)?;
    output.render(format)?;
    Ok(exit_code_for(&output))
}

/// Execute the validate command
pub fn execute_validate(args: &InputArgs, format: OutputFormat) -> Result<ExitCode> {
    let output = resolve_output(args)?.summary_only();
    output.render(format)?;
    Ok(exit_code_for(&output))
}

/// Execute the configure command
pub fn execute_configure(args: &InputArgs, timeout_secs: u64, format: OutputFormat) -> Result<ExitCode> {
    let provider = provider();
    let (inputs, env) = load_sources(&provider, args)?;

    let factory = HttpClientFactory::new().with_timeout(Duration::from_secs(timeout_secs));
    let configuration = provider.configure(&inputs, &env, &factory)?;

    ConfigureOutput::new(&configuration).render(format)?;
    Ok(ExitCode::Success)
}
