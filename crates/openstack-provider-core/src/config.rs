//! Provider configuration
//!
//! [`ProviderConfig`] is the typed, immutable form of the resolved
//! settings. [`ResolvedConfiguration`] pairs it with the client handle the
//! [`ClientFactory`] produced; the host hands it to every resource handler
//! invocation of the activation.

use std::fmt;
use zeroize::Zeroizing;

use crate::client::ClientFactory;
use crate::error::Result;
use crate::resolver::{redact_endpoint, ResolvedSettings, REDACTED};
use crate::schema::{defaults, keys};

/// API versions requested for each service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersions {
    pub compute: String,
    pub block_storage: String,
    pub networking: String,
    pub object_storage: String,
}

impl Default for ApiVersions {
    fn default() -> Self {
        Self {
            compute: defaults::COMPUTE_API_VERSION.to_string(),
            block_storage: defaults::BLOCK_STORAGE_API_VERSION.to_string(),
            networking: defaults::NETWORKING_API_VERSION.to_string(),
            object_storage: defaults::OBJECT_STORAGE_API_VERSION.to_string(),
        }
    }
}

/// Typed provider settings
///
/// Unset optional settings are carried as empty strings, never omitted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub identity_endpoint: String,
    pub user_id: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub tenant_id: String,
    pub tenant_name: String,
    pub domain_id: String,
    pub domain_name: String,
    pub api_versions: ApiVersions,
}

impl ProviderConfig {
    /// Build the typed configuration from resolved settings
    pub fn from_resolved(resolved: &ResolvedSettings) -> Self {
        let get = |key: &str| resolved.get(key).to_string();

        Self {
            identity_endpoint: get(keys::IDENTITY_ENDPOINT),
            user_id: get(keys::USER_ID),
            username: get(keys::USERNAME),
            password: Zeroizing::new(get(keys::PASSWORD)),
            tenant_id: get(keys::TENANT_ID),
            tenant_name: get(keys::TENANT_NAME),
            domain_id: get(keys::DOMAIN_ID),
            domain_name: get(keys::DOMAIN_NAME),
            api_versions: ApiVersions {
                compute: get(keys::COMPUTE_API_VERSION),
                block_storage: get(keys::BLOCK_STORAGE_API_VERSION),
                networking: get(keys::NETWORKING_API_VERSION),
                object_storage: get(keys::OBJECT_STORAGE_API_VERSION),
            },
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { REDACTED };
        f.debug_struct("ProviderConfig")
            .field("identity_endpoint", &redact_endpoint(&self.identity_endpoint))
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("password", &password)
            .field("tenant_id", &self.tenant_id)
            .field("tenant_name", &self.tenant_name)
            .field("domain_id", &self.domain_id)
            .field("domain_name", &self.domain_name)
            .field("api_versions", &self.api_versions)
            .finish()
    }
}

/// Final configuration handed to the host
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration<C> {
    config: ProviderConfig,
    client: C,
}

impl<C> ResolvedConfiguration<C> {
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

/// Build the configuration and invoke the client factory
///
/// A factory failure is returned as [`crate::ProviderError::ClientConstruction`]
/// without retrying.
pub fn build_configuration<F>(resolved: &ResolvedSettings, factory: &F) -> Result<ResolvedConfiguration<F::Client>>
where
    F: ClientFactory + ?Sized,
{
    let config = ProviderConfig::from_resolved(resolved);

    let client = factory.build(&config).map_err(|e| {
        tracing::warn!(error = %e, "Client construction failed");
        e
    })?;

    Ok(ResolvedConfiguration { config, client })
}
