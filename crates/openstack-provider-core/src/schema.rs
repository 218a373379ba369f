//! Provider settings schema
//!
//! The schema is a declarative table: each entry names a setting key, the
//! environment variable it falls back to, whether it is required, and an
//! optional literal default. Resolution against this table happens eagerly
//! in [`crate::resolver`].

/// Well-known setting keys of the OpenStack provider
pub mod keys {
    pub const IDENTITY_ENDPOINT: &str = "identity_endpoint";
    pub const USER_ID: &str = "user_id";
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
    pub const TENANT_ID: &str = "tenant_id";
    pub const TENANT_NAME: &str = "tenant_name";
    pub const DOMAIN_ID: &str = "domain_id";
    pub const DOMAIN_NAME: &str = "domain_name";
    pub const COMPUTE_API_VERSION: &str = "compute_api_version";
    pub const BLOCK_STORAGE_API_VERSION: &str = "block_storage_api_version";
    pub const NETWORKING_API_VERSION: &str = "networking_api_version";
    pub const OBJECT_STORAGE_API_VERSION: &str = "object_storage_api_version";
}

/// Built-in API version defaults
pub mod defaults {
    pub const COMPUTE_API_VERSION: &str = "2";
    pub const BLOCK_STORAGE_API_VERSION: &str = "1";
    pub const NETWORKING_API_VERSION: &str = "2";
    pub const OBJECT_STORAGE_API_VERSION: &str = "1";
}

/// A single named setting definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    /// Setting key as supplied in explicit input
    pub key: &'static str,
    /// Environment variable consulted when no explicit value is given
    pub env_var: &'static str,
    /// Whether an empty resolved value fails validation
    pub required: bool,
    /// Whether the value must be kept out of logs and output
    pub secret: bool,
    /// Literal fallback applied after the environment
    pub default: Option<&'static str>,
    /// Human-readable description
    pub description: &'static str,
}

impl Setting {
    /// Create an optional setting
    pub fn optional(key: &'static str, env_var: &'static str) -> Self {
        Self {
            key,
            env_var,
            required: false,
            secret: false,
            default: None,
            description: "",
        }
    }

    /// Create a required setting
    pub fn required(key: &'static str, env_var: &'static str) -> Self {
        Self {
            required: true,
            ..Self::optional(key, env_var)
        }
    }

    /// Attach a literal default
    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark the setting as secret
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Alternative settings naming the same concept; at least one must be set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityGroup {
    /// Group name used in error reporting
    pub name: &'static str,
    /// Member setting keys, in reporting order
    pub members: &'static [&'static str],
}

impl IdentityGroup {
    pub const fn new(name: &'static str, members: &'static [&'static str]) -> Self {
        Self { name, members }
    }
}

/// The user identity group: `user_id` or `username`
pub const USER_GROUP: IdentityGroup = IdentityGroup::new("user", &[keys::USER_ID, keys::USERNAME]);

/// The tenant identity group: `tenant_id` or `tenant_name`
pub const TENANT_GROUP: IdentityGroup =
    IdentityGroup::new("tenant", &[keys::TENANT_ID, keys::TENANT_NAME]);

/// Identity groups checked by the provider, in validation order
pub fn openstack_groups() -> Vec<IdentityGroup> {
    vec![USER_GROUP, TENANT_GROUP]
}

/// Ordered collection of setting definitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    settings: Vec<Setting>,
}

impl Schema {
    /// Create a schema from an ordered list of settings
    pub fn new(settings: Vec<Setting>) -> Self {
        Self { settings }
    }

    /// The OpenStack provider schema
    pub fn openstack() -> Self {
        use keys::*;

        Self::new(vec![
            Setting::required(IDENTITY_ENDPOINT, "OS_AUTH_URL")
                .with_description("Identity service (Keystone) endpoint URL"),
            Setting::optional(USER_ID, "OS_USERID").with_description("User ID to authenticate as"),
            Setting::optional(USERNAME, "OS_USERNAME")
                .with_description("User name to authenticate as"),
            Setting::required(PASSWORD, "OS_PASSWORD")
                .secret()
                .with_description("Password for the user"),
            Setting::optional(TENANT_ID, "OS_TENANT_ID").with_description("Tenant (project) ID"),
            Setting::optional(TENANT_NAME, "OS_TENANT_NAME")
                .with_description("Tenant (project) name"),
            Setting::optional(DOMAIN_ID, "OS_DOMAIN_ID").with_description("Identity domain ID"),
            Setting::optional(DOMAIN_NAME, "OS_DOMAIN_NAME")
                .with_description("Identity domain name"),
            Setting::optional(COMPUTE_API_VERSION, "OS_COMPUTE_API_VERSION")
                .with_default(defaults::COMPUTE_API_VERSION)
                .with_description("Compute (Nova) API version"),
            Setting::optional(BLOCK_STORAGE_API_VERSION, "OS_VOLUME_API_VERSION")
                .with_default(defaults::BLOCK_STORAGE_API_VERSION)
                .with_description("Block storage (Cinder) API version"),
            Setting::optional(NETWORKING_API_VERSION, "OS_NETWORK_API_VERSION")
                .with_default(defaults::NETWORKING_API_VERSION)
                .with_description("Networking (Neutron) API version"),
            Setting::optional(OBJECT_STORAGE_API_VERSION, "OS_OBJECT_API_VERSION")
                .with_default(defaults::OBJECT_STORAGE_API_VERSION)
                .with_description("Object storage (Swift) API version"),
        ])
    }

    /// Look up a setting by key
    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.key == key)
    }

    /// Check whether the schema declares a key
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate settings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.settings.iter()
    }

    /// Environment variable names consulted by this schema
    pub fn env_vars(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.settings.iter().map(|s| s.env_var)
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::openstack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openstack_schema_shape() {
        let schema = Schema::openstack();
        assert_eq!(schema.len(), 12);

        let required: Vec<_> = schema.iter().filter(|s| s.required).map(|s| s.key).collect();
        assert_eq!(required, vec![keys::IDENTITY_ENDPOINT, keys::PASSWORD]);
    }

    #[test]
    fn test_defaults_are_exactly_keyed() {
        let schema = Schema::openstack();
        let defaults: Vec<_> = schema
            .iter()
            .filter_map(|s| s.default.map(|d| (s.key, d)))
            .collect();

        assert_eq!(
            defaults,
            vec![
                (keys::COMPUTE_API_VERSION, "2"),
                (keys::BLOCK_STORAGE_API_VERSION, "1"),
                (keys::NETWORKING_API_VERSION, "2"),
                (keys::OBJECT_STORAGE_API_VERSION, "1"),
            ]
        );
    }

    #[test]
    fn test_env_var_mapping() {
        let schema = Schema::openstack();
        assert_eq!(schema.get(keys::IDENTITY_ENDPOINT).unwrap().env_var, "OS_AUTH_URL");
        assert_eq!(schema.get(keys::USER_ID).unwrap().env_var, "OS_USERID");
        assert_eq!(
            schema.get(keys::BLOCK_STORAGE_API_VERSION).unwrap().env_var,
            "OS_VOLUME_API_VERSION"
        );
        assert!(!schema.contains("region"));
    }

    #[test]
    fn test_only_password_is_secret() {
        let schema = Schema::openstack();
        let secrets: Vec<_> = schema.iter().filter(|s| s.secret).map(|s| s.key).collect();
        assert_eq!(secrets, vec![keys::PASSWORD]);
    }

    #[test]
    fn test_group_order() {
        let groups = openstack_groups();
        assert_eq!(groups[0].name, "user");
        assert_eq!(groups[0].members, &[keys::USER_ID, keys::USERNAME]);
        assert_eq!(groups[1].name, "tenant");
    }
}
