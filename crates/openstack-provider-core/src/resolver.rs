//! Setting resolution
//!
//! Each setting is resolved through a fixed priority chain. The first
//! source that yields a non-empty value wins:
//!
//! 1. explicit input
//! 2. the setting's environment variable
//! 3. the setting's literal default
//! 4. the empty string
//!
//! Resolution is a pure function of the inputs, the schema and the
//! environment snapshot. It never fails; validation happens afterwards.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use crate::schema::{keys, Schema};
use crate::sources::{EnvSnapshot, Inputs};

/// Placeholder printed instead of secret values
pub const REDACTED: &str = "<redacted>";

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// Supplied explicitly by the caller
    Explicit,
    /// Read from the setting's environment variable
    Environment,
    /// Taken from the schema's literal default
    Default,
    /// Nothing supplied; resolved to the empty string
    Empty,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueSource::Explicit => write!(f, "explicit"),
            ValueSource::Environment => write!(f, "environment"),
            ValueSource::Default => write!(f, "default"),
            ValueSource::Empty => write!(f, "empty"),
        }
    }
}

/// Mask the `user:password@` part of an endpoint for logs and messages
///
/// Works on the raw text so that endpoints which fail to parse are masked
/// too.
pub fn redact_endpoint(raw: &str) -> String {
    let (scheme, rest) = match raw.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, raw),
    };
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());

    match rest[..authority_end].rfind('@') {
        Some(at) => {
            let masked = format!("{}@{}", REDACTED, &rest[at + 1..]);
            match scheme {
                Some(scheme) => format!("{}://{}", scheme, masked),
                None => masked,
            }
        }
        None => raw.to_string(),
    }
}

/// A single resolved setting
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub key: &'static str,
    pub value: String,
    pub source: ValueSource,
    pub secret: bool,
}

impl ResolvedValue {
    /// The value, or a redaction marker for non-empty secrets
    ///
    /// Credentials embedded in the identity endpoint are masked as well.
    pub fn display_value(&self) -> Cow<'_, str> {
        if self.secret && !self.value.is_empty() {
            Cow::Borrowed(REDACTED)
        } else if self.key == keys::IDENTITY_ENDPOINT {
            Cow::Owned(redact_endpoint(&self.value))
        } else {
            Cow::Borrowed(&self.value)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedValue")
            .field("key", &self.key)
            .field("value", &self.display_value())
            .field("source", &self.source)
            .finish()
    }
}

/// Resolved values for every key of a schema, in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    entries: Vec<ResolvedValue>,
}

impl ResolvedSettings {
    /// Look up a resolved entry
    pub fn entry(&self, key: &str) -> Option<&ResolvedValue> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// The resolved value for `key`; keys outside the schema read as empty
    pub fn get(&self, key: &str) -> &str {
        self.entry(key).map_or("", |e| e.value.as_str())
    }

    /// Where the value for `key` came from
    pub fn source(&self, key: &str) -> Option<ValueSource> {
        self.entry(key).map(|e| e.source)
    }

    /// Iterate entries in schema order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedValue> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve every setting of `schema`
pub fn resolve(inputs: &Inputs, schema: &Schema, env: &EnvSnapshot) -> ResolvedSettings {
    for key in inputs.keys().filter(|k| !schema.contains(k)) {
        tracing::warn!(key = key, "Ignoring input for unknown setting");
    }

    let entries = schema
        .iter()
        .map(|setting| {
            let (value, source) = if let Some(v) = inputs.get(setting.key) {
                (v.to_string(), ValueSource::Explicit)
            } else if let Some(v) = env.get(setting.env_var) {
                (v.to_string(), ValueSource::Environment)
            } else if let Some(v) = setting.default.filter(|d| !d.is_empty()) {
                (v.to_string(), ValueSource::Default)
            } else {
                (String::new(), ValueSource::Empty)
            };

            tracing::debug!(
                key = setting.key,
                env_var = setting.env_var,
                source = %source,
                "Resolved setting"
            );

            ResolvedValue {
                key: setting.key,
                value,
                source,
                secret: setting.secret,
            }
        })
        .collect();

    ResolvedSettings { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{keys, Setting};

    #[test]
    fn test_defaults_without_input_or_env() {
        let resolved = resolve(&Inputs::new(), &Schema::openstack(), &EnvSnapshot::new());

        assert_eq!(resolved.get(keys::COMPUTE_API_VERSION), "2");
        assert_eq!(resolved.get(keys::BLOCK_STORAGE_API_VERSION), "1");
        assert_eq!(resolved.get(keys::NETWORKING_API_VERSION), "2");
        assert_eq!(resolved.get(keys::OBJECT_STORAGE_API_VERSION), "1");
        assert_eq!(resolved.source(keys::COMPUTE_API_VERSION), Some(ValueSource::Default));

        for key in [keys::IDENTITY_ENDPOINT, keys::USER_ID, keys::DOMAIN_NAME, keys::PASSWORD] {
            assert_eq!(resolved.get(key), "");
            assert_eq!(resolved.source(key), Some(ValueSource::Empty));
        }
    }

    #[test]
    fn test_every_schema_key_is_present() {
        let schema = Schema::openstack();
        let resolved = resolve(&Inputs::new(), &schema, &EnvSnapshot::new());

        assert_eq!(resolved.len(), schema.len());
        let keys: Vec<_> = resolved.iter().map(|e| e.key).collect();
        let expected: Vec<_> = schema.iter().map(|s| s.key).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_precedence_chain() {
        let schema = Schema::new(vec![
            Setting::optional("a", "A").with_default("default-a"),
            Setting::optional("b", "B").with_default("default-b"),
            Setting::optional("c", "C").with_default("default-c"),
            Setting::optional("d", "D"),
        ]);
        let inputs = Inputs::new().with("a", "explicit-a");
        let env = EnvSnapshot::new()
            .with_var("A", "env-a")
            .with_var("B", "env-b");

        let resolved = resolve(&inputs, &schema, &env);

        assert_eq!(resolved.get("a"), "explicit-a");
        assert_eq!(resolved.source("a"), Some(ValueSource::Explicit));
        assert_eq!(resolved.get("b"), "env-b");
        assert_eq!(resolved.source("b"), Some(ValueSource::Environment));
        assert_eq!(resolved.get("c"), "default-c");
        assert_eq!(resolved.get("d"), "");
    }

    #[test]
    fn test_empty_values_fall_through() {
        let inputs = Inputs::new().with(keys::COMPUTE_API_VERSION, "");
        let env = EnvSnapshot::new().with_var("OS_COMPUTE_API_VERSION", "");

        let resolved = resolve(&inputs, &Schema::openstack(), &env);
        assert_eq!(resolved.get(keys::COMPUTE_API_VERSION), "2");
        assert_eq!(resolved.source(keys::COMPUTE_API_VERSION), Some(ValueSource::Default));
    }

    #[test]
    fn test_env_overrides_default() {
        let env = EnvSnapshot::new().with_var("OS_COMPUTE_API_VERSION", "3");
        let resolved = resolve(&Inputs::new(), &Schema::openstack(), &env);
        assert_eq!(resolved.get(keys::COMPUTE_API_VERSION), "3");
    }

    #[test]
    fn test_unknown_inputs_are_ignored() {
        let inputs = Inputs::new().with("region", "RegionOne");
        let resolved = resolve(&inputs, &Schema::openstack(), &EnvSnapshot::new());
        assert!(resolved.entry("region").is_none());
        assert_eq!(resolved.get("region"), "");
    }

    #[test]
    fn test_secret_redaction() {
        let inputs = Inputs::new().with(keys::PASSWORD, "hunter2");
        let resolved = resolve(&inputs, &Schema::openstack(), &EnvSnapshot::new());

        let entry = resolved.entry(keys::PASSWORD).unwrap();
        assert_eq!(entry.value, "hunter2");
        assert_eq!(entry.display_value(), REDACTED);
        assert!(!format!("{:?}", resolved).contains("hunter2"));
    }

    #[test]
    fn test_redact_endpoint() {
        assert_eq!(
            redact_endpoint("https://admin:pw@identity.example.com:5000/v3"),
            "https://<redacted>@identity.example.com:5000/v3"
        );
        assert_eq!(redact_endpoint("https://admin:p@ss@host/v3"), "https://<redacted>@host/v3");
        assert_eq!(redact_endpoint("admin:pw@host"), "<redacted>@host");
        assert_eq!(
            redact_endpoint("https://identity.example.com/v3?user=a@b"),
            "https://identity.example.com/v3?user=a@b"
        );
        assert_eq!(redact_endpoint(""), "");
    }

    #[test]
    fn test_endpoint_credentials_masked_in_display() {
        let inputs = Inputs::new().with(keys::IDENTITY_ENDPOINT, "https://admin:pw@identity.example.com");
        let resolved = resolve(&inputs, &Schema::openstack(), &EnvSnapshot::new());

        let entry = resolved.entry(keys::IDENTITY_ENDPOINT).unwrap();
        assert_eq!(entry.value, "https://admin:pw@identity.example.com");
        assert_eq!(entry.display_value(), "https://<redacted>@identity.example.com");
        assert!(!format!("{:?}", resolved).contains(":pw@"));
    }
}
