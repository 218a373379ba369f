//! OpenStack Provider CLI
//!
//! # Usage
//!
//! ```bash
//! os-provider schema --format yaml
//! os-provider resolve --config provider.toml
//! os-provider validate --env-file .env
//! os-provider configure -v --log-format json
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Required setting or identity group missing
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 6: Client construction failed
//! - 10: Internal error

use clap::Parser;
use openstack_provider_cli::{init_tracing, run_cli, ProviderCli};

fn main() {
    let cli = ProviderCli::parse();

    init_tracing(cli.verbose, cli.log_format);

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
