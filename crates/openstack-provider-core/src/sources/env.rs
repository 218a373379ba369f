//! Environment snapshots
//!
//! The resolver never reads the process environment directly. Callers
//! capture an [`EnvSnapshot`] up front (from the process, from a `.env`
//! file, or from literal pairs in tests) and thread it through resolution.
//!
//! # Example
//!
//! ```rust
//! use openstack_provider_core::EnvSnapshot;
//!
//! let env = EnvSnapshot::new()
//!     .with_var("OS_AUTH_URL", "https://identity.example.com/v2.0")
//!     .with_var("OS_PASSWORD", "");
//!
//! assert_eq!(env.get("OS_AUTH_URL"), Some("https://identity.example.com/v2.0"));
//! // Empty and absent variables are indistinguishable
//! assert_eq!(env.get("OS_PASSWORD"), None);
//! assert_eq!(env.get("OS_USERNAME"), None);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Owned, read-only view of environment variables
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture only the named variables of the current process
    pub fn capture_vars<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let vars = names
            .into_iter()
            .filter_map(|name| match std::env::var(name) {
                Ok(value) => Some((name.to_string(), value)),
                Err(std::env::VarError::NotPresent) => None,
                Err(std::env::VarError::NotUnicode(_)) => {
                    tracing::warn!(var = name, "Ignoring environment variable with invalid UTF-8");
                    None
                }
            })
            .collect();
        Self { vars }
    }

    /// Build a snapshot from literal pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Add or replace a variable (builder pattern)
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Get a variable's value; empty values are reported as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Fill variables that are absent or empty here from `other`
    ///
    /// Variables already set in `self` keep their value, matching the
    /// usual `.env` convention of never overriding the real environment.
    pub fn fill_from(mut self, other: EnvSnapshot) -> Self {
        for (name, value) in other.vars {
            let missing = self.vars.get(&name).map_or(true, |v| v.is_empty());
            if missing {
                self.vars.insert(name, value);
            }
        }
        self
    }

    /// Load a snapshot from a `.env` file
    pub fn from_dotenv_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loaded .env file");
        Ok(Self::parse_dotenv(&content))
    }

    /// Parse `.env` content
    ///
    /// Supports `# comments`, blank lines, an optional `export ` prefix,
    /// single or double quoted values and `\n`, `\t`, `\r` escapes.
    pub fn parse_dotenv(content: &str) -> Self {
        let mut vars = BTreeMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);

            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim().to_string();
                if key.is_empty() {
                    continue;
                }
                let mut value = line[eq_pos + 1..].trim().to_string();

                if value.len() >= 2
                    && ((value.starts_with('"') && value.ends_with('"'))
                        || (value.starts_with('\'') && value.ends_with('\'')))
                {
                    value = value[1..value.len() - 1].to_string();
                }

                value = value
                    .replace("\\n", "\n")
                    .replace("\\t", "\t")
                    .replace("\\r", "\r");

                vars.insert(key, value);
            }
        }

        Self { vars }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

// Values may hold credentials; only names are printed.
impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSnapshot")
            .field("vars", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}
