//! Resource registry
//!
//! Maps stable resource-type names to lifecycle handlers. The registry is
//! populated once when the provider is assembled and only read afterwards;
//! the host dispatches create/read/update/delete calls through it.
//!
//! # Example
//!
//! ```rust,ignore
//! use openstack_provider_core::{ResourceKind, ResourceRegistry};
//!
//! let registry = ResourceRegistry::<String>::new()
//!     .with_handler(ResourceKind::Instance, InstanceHandler::new())?
//!     .with_handler(ResourceKind::Keypair, KeypairHandler::new())?;
//!
//! let created = registry.create("openstack_keypair", &configuration, data).await?;
//! ```

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::ResolvedConfiguration;
use crate::error::{ProviderError, Result};

/// Resource types shipped with the OpenStack provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Instance,
    Keypair,
    FloatingIp,
    Secgroup,
    Volume,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Instance,
        ResourceKind::Keypair,
        ResourceKind::FloatingIp,
        ResourceKind::Secgroup,
        ResourceKind::Volume,
    ];

    /// Stable type name used by the host
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Instance => "openstack_instance",
            ResourceKind::Keypair => "openstack_keypair",
            ResourceKind::FloatingIp => "openstack_floating_ip",
            ResourceKind::Secgroup => "openstack_secgroup",
            ResourceKind::Volume => "openstack_volume",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ProviderError::UnknownResource(s.to_string()))
    }
}

/// Attribute state of a single resource instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceData {
    /// Identifier assigned by the cloud, once created
    pub id: Option<String>,
    /// Flat attribute map
    pub attributes: BTreeMap<String, String>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// Lifecycle operations for one resource type
///
/// Every call receives the activation's shared configuration. Handlers
/// should report failures with [`ProviderError::Resource`].
#[async_trait]
pub trait ResourceHandler<C>: Send + Sync {
    /// Create the resource and return its state including the new id
    async fn create(&self, ctx: &ResolvedConfiguration<C>, data: ResourceData) -> Result<ResourceData>;

    /// Read current state; `None` when the resource no longer exists
    async fn read(&self, ctx: &ResolvedConfiguration<C>, id: &str) -> Result<Option<ResourceData>>;

    /// Apply changed attributes and return the new state
    async fn update(&self, ctx: &ResolvedConfiguration<C>, data: ResourceData) -> Result<ResourceData>;

    /// Delete the resource
    async fn delete(&self, ctx: &ResolvedConfiguration<C>, id: &str) -> Result<()>;
}

/// Name-to-handler mapping
pub struct ResourceRegistry<C> {
    handlers: BTreeMap<String, Arc<dyn ResourceHandler<C>>>,
}

impl<C> fmt::Debug for ResourceRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resources", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<C> Default for ResourceRegistry<C> {
    fn default() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }
}

impl<C> ResourceRegistry<C>
where
    C: Send + Sync + 'static,
{
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a name
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> Result<()>
    where
        H: ResourceHandler<C> + 'static,
    {
        self.register_arc(name, Arc::new(handler))
    }

    /// Register a pre-wrapped handler
    pub fn register_arc(&mut self, name: impl Into<String>, handler: Arc<dyn ResourceHandler<C>>) -> Result<()> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(ProviderError::DuplicateResource(name));
        }
        tracing::debug!(resource = %name, "Registered resource handler");
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Register a handler for a standard resource kind (builder pattern)
    pub fn with_handler<H>(mut self, kind: ResourceKind, handler: H) -> Result<Self>
    where
        H: ResourceHandler<C> + 'static,
    {
        self.register(kind.name(), handler)?;
        Ok(self)
    }

    /// Look up the handler for `name`
    pub fn handler(&self, name: &str) -> Result<&Arc<dyn ResourceHandler<C>>> {
        self.handlers
            .get(name)
            .ok_or_else(|| ProviderError::UnknownResource(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub async fn create(&self, name: &str, ctx: &ResolvedConfiguration<C>, data: ResourceData) -> Result<ResourceData> {
        tracing::debug!(resource = name, "Dispatching create");
        self.handler(name)?.create(ctx, data).await
    }

    pub async fn read(&self, name: &str, ctx: &ResolvedConfiguration<C>, id: &str) -> Result<Option<ResourceData>> {
        tracing::debug!(resource = name, id = id, "Dispatching read");
        self.handler(name)?.read(ctx, id).await
    }

    pub async fn update(&self, name: &str, ctx: &ResolvedConfiguration<C>, data: ResourceData) -> Result<ResourceData> {
        tracing::debug!(resource = name, "Dispatching update");
        self.handler(name)?.update(ctx, data).await
    }

    pub async fn delete(&self, name: &str, ctx: &ResolvedConfiguration<C>, id: &str) -> Result<()> {
        tracing::debug!(resource = name, id = id, "Dispatching delete");
        self.handler(name)?.delete(ctx, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockClientFactory;
    use crate::config::build_configuration;
    use crate::resolver::resolve;
    use crate::schema::Schema;
    use crate::sources::{EnvSnapshot, Inputs};
    use std::sync::Mutex;

    /// In-memory handler keyed by generated ids
    #[derive(Default)]
    struct MemoryHandler {
        store: Mutex<BTreeMap<String, ResourceData>>,
    }

    #[async_trait]
    impl ResourceHandler<String> for MemoryHandler {
        async fn create(&self, ctx: &ResolvedConfiguration<String>, data: ResourceData) -> Result<ResourceData> {
            let mut store = self.store.lock().unwrap();
            let id = format!("{}-{}", ctx.client(), store.len() + 1);
            let data = data.with_id(id.clone());
            store.insert(id, data.clone());
            Ok(data)
        }

        async fn read(&self, _ctx: &ResolvedConfiguration<String>, id: &str) -> Result<Option<ResourceData>> {
            Ok(self.store.lock().unwrap().get(id).cloned())
        }

        async fn update(&self, _ctx: &ResolvedConfiguration<String>, data: ResourceData) -> Result<ResourceData> {
            let id = data
                .id
                .clone()
                .ok_or_else(|| ProviderError::resource("memory", "update without id"))?;
            self.store.lock().unwrap().insert(id, data.clone());
            Ok(data)
        }

        async fn delete(&self, _ctx: &ResolvedConfiguration<String>, id: &str) -> Result<()> {
            self.store.lock().unwrap().remove(id);
            Ok(())
        }
    }

    fn context() -> ResolvedConfiguration<String> {
        let resolved = resolve(&Inputs::new(), &Schema::openstack(), &EnvSnapshot::new());
        let mut factory = MockClientFactory::new();
        factory.expect_build().returning(|_| Ok("mem".to_string()));
        build_configuration(&resolved, &factory).unwrap()
    }

    #[test]
    fn test_resource_kind_names() {
        let names: Vec<_> = ResourceKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec![
                "openstack_instance",
                "openstack_keypair",
                "openstack_floating_ip",
                "openstack_secgroup",
                "openstack_volume",
            ]
        );
        assert_eq!("openstack_volume".parse::<ResourceKind>().unwrap(), ResourceKind::Volume);
        assert!("openstack_router".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ResourceRegistry::<String>::new();
        registry.register("openstack_keypair", MemoryHandler::default()).unwrap();

        let err = registry
            .register("openstack_keypair", MemoryHandler::default())
            .unwrap_err();
        assert!(matches!(err, ProviderError::DuplicateResource(name) if name == "openstack_keypair"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_lifecycle() {
        let registry = ResourceRegistry::<String>::new()
            .with_handler(ResourceKind::Keypair, MemoryHandler::default())
            .unwrap();
        let ctx = context();

        let created = registry
            .create(
                "openstack_keypair",
                &ctx,
                ResourceData::new().with_attribute("name", "deploy"),
            )
            .await
            .unwrap();
        let id = created.id.clone().unwrap();
        assert_eq!(id, "mem-1");

        let updated = registry
            .update("openstack_keypair", &ctx, created.with_attribute("name", "deploy-2"))
            .await
            .unwrap();
        assert_eq!(updated.attribute("name"), Some("deploy-2"));

        let read = registry.read("openstack_keypair", &ctx, &id).await.unwrap();
        assert_eq!(read.unwrap().attribute("name"), Some("deploy-2"));

        registry.delete("openstack_keypair", &ctx, &id).await.unwrap();
        assert!(registry.read("openstack_keypair", &ctx, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_resource() {
        let registry = ResourceRegistry::<String>::new();
        let err = registry
            .delete("openstack_instance", &context(), "i-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[test]
    fn test_debug_lists_names() {
        let registry = ResourceRegistry::<String>::new()
            .with_handler(ResourceKind::Volume, MemoryHandler::default())
            .unwrap();
        assert!(format!("{:?}", registry).contains("openstack_volume"));
    }
}
