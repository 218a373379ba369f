//! Setting value sources
//!
//! Resolution consults two external sources before falling back to the
//! schema's literal defaults:
//!
//! - **Explicit inputs** ([`Inputs`]): values supplied by the caller, either
//!   programmatically or from a JSON, TOML or YAML bundle
//! - **Environment** ([`EnvSnapshot`]): an owned snapshot of environment
//!   variables, captured from the process or parsed from a `.env` file

pub mod env;
pub mod inputs;

pub use env::EnvSnapshot;
pub use inputs::{parse_assignment, BundleFormat, Inputs};
