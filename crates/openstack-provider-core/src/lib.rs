//! OpenStack Provider Core
//!
//! Configuration wiring for the OpenStack infrastructure provider: the
//! settings schema, environment defaulting, credential validation, client
//! construction and the resource-handler registry the host dispatches
//! through.
//!
//! ## Resolution Order
//!
//! Every setting resolves to exactly one string, taken from the first
//! non-empty source:
//!
//! 1. **Explicit input** ([`Inputs`])
//! 2. **Environment variable** ([`EnvSnapshot`]), e.g. `OS_AUTH_URL`
//! 3. **Built-in default** (API versions only)
//! 4. the empty string
//!
//! ## Validation
//!
//! `identity_endpoint` and `password` are required. At least one of
//! `user_id`/`username` and at least one of `tenant_id`/`tenant_name` must
//! be set. Validation stops at the first failure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use openstack_provider_core::{
//!     EnvSnapshot, HttpClientFactory, Inputs, OpenStackClient, Provider, ResourceRegistry,
//! };
//!
//! let provider: Provider<OpenStackClient> = Provider::new(ResourceRegistry::new());
//!
//! let inputs = Inputs::new()
//!     .with("identity_endpoint", "https://identity.example.com:5000/v2.0")
//!     .with("password", "secret")
//!     .with("username", "alice")
//!     .with("tenant_name", "demo");
//!
//! let env = provider.capture_env();
//! let configuration = provider
//!     .configure(&inputs, &env, &HttpClientFactory::new())
//!     .unwrap();
//!
//! assert_eq!(configuration.config().api_versions.compute, "2");
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod sources;
pub mod validation;

pub use client::{ApiVersion, ClientError, ClientFactory, HttpClientFactory, OpenStackClient, ServiceVersions};
pub use config::{build_configuration, ApiVersions, ProviderConfig, ResolvedConfiguration};
pub use error::{ProviderError, Result};
pub use provider::Provider;
pub use registry::{ResourceData, ResourceHandler, ResourceKind, ResourceRegistry};
pub use resolver::{redact_endpoint, resolve, ResolvedSettings, ResolvedValue, ValueSource};
pub use schema::{keys, IdentityGroup, Schema, Setting, TENANT_GROUP, USER_GROUP};
pub use sources::{BundleFormat, EnvSnapshot, Inputs};
pub use validation::{validate_exclusive_groups, validate_required};

/// Crate version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provider name used as the resource-type prefix
pub const PROVIDER_NAME: &str = "openstack";
