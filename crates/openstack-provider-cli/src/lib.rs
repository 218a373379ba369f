//! OpenStack Provider CLI
//!
//! Command-line front end for [`openstack_provider_core`]: shows the
//! settings schema, resolves settings from config bundles, `--set`
//! overrides and the environment, and runs the full activation.
//!
//! ## CLI Usage
//!
//! ```bash
//! # List every setting with its environment variable and default
//! os-provider schema
//!
//! # Show resolved settings and their sources (password redacted)
//! os-provider resolve --config provider.toml --format json
//!
//! # Validate using a .env file for missing variables
//! os-provider validate --env-file .env --set tenant_name=demo
//!
//! # Prepare a client without contacting the cloud
//! os-provider configure --timeout-secs 10
//! ```
//!
//! ## Exit Codes
//!
//! - 0: Success
//! - 1: Required setting or identity group missing
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 6: Client construction failed
//! - 10: Internal error

pub mod cli;
pub mod error;

pub use cli::{ExitCode, InputArgs, LogFormat, OutputFormat, ProviderCli, ProviderCommands};
pub use error::{CliError, Result};

use tracing::Level;

/// Run the CLI and map any failure to an exit code
///
/// # Example
///
/// ```rust,no_run
/// use clap::Parser;
/// use openstack_provider_cli::{run_cli, ProviderCli};
///
/// fn main() {
///     let cli = ProviderCli::parse();
///     let exit_code = run_cli(cli);
///     std::process::exit(exit_code.into());
/// }
/// ```
pub fn run_cli(cli: ProviderCli) -> ExitCode {
    match cli::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from_error(&e)
        }
    }
}

/// Map the `-v` count to a log level
pub fn verbosity_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global tracing subscriber, writing to stderr
///
/// `RUST_LOG` directives are honored; `-v` raises the baseline level.
pub fn init_tracing(verbose: u8, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(verbosity_level(verbose).into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
