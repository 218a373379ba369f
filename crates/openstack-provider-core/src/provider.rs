//! Provider assembly
//!
//! A [`Provider`] bundles the settings schema, the identity groups and the
//! resource registry. [`Provider::configure`] runs one activation:
//!
//! 1. resolve every setting (explicit > environment > default > empty)
//! 2. check required settings
//! 3. check identity groups, stopping at the first failing group
//! 4. build the configuration and hand it to the client factory

use crate::client::ClientFactory;
use crate::config::{build_configuration, ResolvedConfiguration};
use crate::error::Result;
use crate::registry::{ResourceKind, ResourceRegistry};
use crate::resolver::{redact_endpoint, resolve, ResolvedSettings};
use crate::schema::{openstack_groups, IdentityGroup, Schema};
use crate::sources::{EnvSnapshot, Inputs};
use crate::validation::{validate_exclusive_groups, validate_required};

/// The OpenStack provider definition
#[derive(Debug)]
pub struct Provider<C> {
    schema: Schema,
    groups: Vec<IdentityGroup>,
    resources: ResourceRegistry<C>,
}

impl<C> Provider<C>
where
    C: Send + Sync + 'static,
{
    /// Create the OpenStack provider with the given resource handlers
    pub fn new(resources: ResourceRegistry<C>) -> Self {
        Self::with_schema(Schema::openstack(), openstack_groups(), resources)
    }

    /// Create a provider with a custom schema and identity groups
    pub fn with_schema(schema: Schema, groups: Vec<IdentityGroup>, resources: ResourceRegistry<C>) -> Self {
        Self {
            schema,
            groups,
            resources,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn groups(&self) -> &[IdentityGroup] {
        &self.groups
    }

    pub fn resources(&self) -> &ResourceRegistry<C> {
        &self.resources
    }

    /// Capture the environment variables this provider's schema reads
    pub fn capture_env(&self) -> EnvSnapshot {
        EnvSnapshot::capture_vars(self.schema.env_vars())
    }

    /// Standard resource kinds without a registered handler
    pub fn missing_standard_resources(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| !self.resources.contains(kind.name()))
            .collect()
    }

    /// Resolve settings and run both validation gates
    pub fn resolve(&self, inputs: &Inputs, env: &EnvSnapshot) -> Result<ResolvedSettings> {
        let resolved = resolve(inputs, &self.schema, env);
        validate_required(&resolved, &self.schema)?;
        validate_exclusive_groups(&resolved, &self.groups)?;
        Ok(resolved)
    }

    /// Run a full activation and return the configuration for the host
    pub fn configure<F>(&self, inputs: &Inputs, env: &EnvSnapshot, factory: &F) -> Result<ResolvedConfiguration<C>>
    where
        F: ClientFactory<Client = C> + ?Sized,
    {
        let resolved = self.resolve(inputs, env).map_err(|e| {
            tracing::warn!(error = %e, "Provider configuration rejected");
            e
        })?;

        let configuration = build_configuration(&resolved, factory)?;

        tracing::info!(
            endpoint = %redact_endpoint(&configuration.config().identity_endpoint),
            resources = self.resources.len(),
            "Provider configured"
        );

        Ok(configuration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, MockClientFactory};
    use crate::schema::keys;
    use crate::ProviderError;

    fn provider() -> Provider<String> {
        Provider::new(ResourceRegistry::new())
    }

    fn ok_factory() -> MockClientFactory {
        let mut factory = MockClientFactory::new();
        factory.expect_build().returning(|_| Ok("client".to_string()));
        factory
    }

    fn full_inputs() -> Inputs {
        Inputs::new()
            .with(keys::IDENTITY_ENDPOINT, "https://id.example.com")
            .with(keys::PASSWORD, "p")
            .with(keys::USERNAME, "alice")
            .with(keys::TENANT_NAME, "t1")
    }

    #[test]
    fn test_configure_success() {
        let configuration = provider()
            .configure(&full_inputs(), &EnvSnapshot::new(), &ok_factory())
            .unwrap();

        assert_eq!(configuration.client(), "client");
        assert_eq!(configuration.config().api_versions.object_storage, "1");
    }

    #[test]
    fn test_validation_runs_before_factory() {
        let mut factory = MockClientFactory::new();
        factory.expect_build().times(0);

        let inputs = Inputs::new()
            .with(keys::IDENTITY_ENDPOINT, "https://id.example.com")
            .with(keys::PASSWORD, "p");
        let err = provider()
            .configure(&inputs, &EnvSnapshot::new(), &factory)
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingRequiredGroup { ref group, .. } if group == "user"));
    }

    #[test]
    fn test_required_checked_before_groups() {
        let err = provider().resolve(&Inputs::new(), &EnvSnapshot::new()).unwrap_err();
        assert!(matches!(err, ProviderError::MissingRequiredSetting { .. }));
    }

    #[test]
    fn test_factory_failure() {
        let mut factory = MockClientFactory::new();
        factory
            .expect_build()
            .returning(|_| Err(ClientError::InvalidEndpoint("bad".to_string())));

        let err = provider()
            .configure(&full_inputs(), &EnvSnapshot::new(), &factory)
            .unwrap_err();
        assert!(matches!(err, ProviderError::ClientConstruction(ClientError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_missing_standard_resources() {
        let provider = provider();
        assert_eq!(provider.missing_standard_resources(), ResourceKind::ALL.to_vec());
    }
}
