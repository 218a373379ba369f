//! Explicit setting inputs
//!
//! Explicit values are the highest-priority source during resolution. They
//! can be set programmatically, parsed from `key=value` assignments, or
//! loaded from a configuration bundle in JSON, TOML or YAML.
//!
//! # Bundle Structure
//!
//! Settings may sit at the top level or inside a `provider` table:
//!
//! ```toml
//! [provider]
//! identity_endpoint = "https://identity.example.com/v2.0"
//! username = "alice"
//! compute_api_version = 2
//! ```
//!
//! Integers and booleans are converted to their string form; `null` leaves
//! the setting unset. Fractional numbers are rejected because parsing them
//! loses their exact text (`2.10` would become `2.1`), so versions such as
//! microversions must be quoted.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{ProviderError, Result};

/// Table name that may wrap settings inside a bundle
const PROVIDER_TABLE: &str = "provider";

/// Supported bundle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFormat {
    Json,
    Toml,
    Yaml,
}

impl BundleFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "json" => Some(BundleFormat::Json),
            "toml" => Some(BundleFormat::Toml),
            "yaml" | "yml" => Some(BundleFormat::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for BundleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleFormat::Json => write!(f, "json"),
            BundleFormat::Toml => write!(f, "toml"),
            BundleFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Explicitly supplied setting values
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Inputs {
    values: BTreeMap<String, String>,
}

impl Inputs {
    /// Create an empty input set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value (builder pattern)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value, replacing any previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get an explicitly supplied value; empty values count as not supplied
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Keys present in the input, including ones with empty values
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Overlay `other` on top of `self`; non-empty values in `other` win
    pub fn merge(mut self, other: Inputs) -> Self {
        for (key, value) in other.values {
            if !value.is_empty() || !self.values.contains_key(&key) {
                self.values.insert(key, value);
            }
        }
        self
    }

    /// Apply a `key=value` assignment
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = parse_assignment(assignment)?;
        self.set(key, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Load inputs from a bundle file, detecting the format by extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = BundleFormat::from_path(path).ok_or_else(|| {
            ProviderError::invalid_input(format!(
                "Unsupported config file extension: {} (expected .json, .toml, .yaml or .yml)",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        let inputs = Self::from_str_with_format(&content, format)?;
        tracing::debug!(
            path = %path.display(),
            format = %format,
            keys = inputs.len(),
            "Loaded input bundle"
        );
        Ok(inputs)
    }

    /// Parse inputs from bundle content in the given format
    pub fn from_str_with_format(content: &str, format: BundleFormat) -> Result<Self> {
        let value: JsonValue = match format {
            BundleFormat::Json => serde_json::from_str(content)?,
            BundleFormat::Yaml => serde_yaml::from_str(content)?,
            BundleFormat::Toml => {
                let value: toml::Value = toml::from_str(content)?;
                serde_json::to_value(value)?
            }
        };
        Self::from_json_value(value)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_str_with_format(content, BundleFormat::Json)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_str_with_format(content, BundleFormat::Toml)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::from_str_with_format(content, BundleFormat::Yaml)
    }

    fn from_json_value(value: JsonValue) -> Result<Self> {
        let mut root = match value {
            JsonValue::Object(map) => map,
            JsonValue::Null => return Ok(Self::new()),
            other => {
                return Err(ProviderError::parse_error(format!(
                    "Config bundle must be a table of settings, found {}",
                    json_type_name(&other)
                )))
            }
        };

        let table = match root.remove(PROVIDER_TABLE) {
            Some(JsonValue::Object(provider)) if root.is_empty() => provider,
            Some(JsonValue::Object(_)) => {
                return Err(ProviderError::parse_error(format!(
                    "Settings must either all sit inside the '{}' table or all at the top level",
                    PROVIDER_TABLE
                )))
            }
            Some(other) => {
                return Err(ProviderError::parse_error(format!(
                    "'{}' must be a table, found {}",
                    PROVIDER_TABLE,
                    json_type_name(&other)
                )))
            }
            None => root,
        };

        let mut inputs = Self::new();
        for (key, value) in table {
            match value {
                JsonValue::String(s) => inputs.set(key, s),
                JsonValue::Number(n) if n.is_f64() => {
                    return Err(ProviderError::parse_error(format!(
                        "Setting '{}' is a fractional number, which cannot be kept exactly; quote it as a string (e.g. \"2.10\")",
                        key
                    )))
                }
                JsonValue::Number(n) => inputs.set(key, n.to_string()),
                JsonValue::Bool(b) => inputs.set(key, b.to_string()),
                JsonValue::Null => {}
                other => {
                    return Err(ProviderError::parse_error(format!(
                        "Setting '{}' must be a scalar value, found {}",
                        key,
                        json_type_name(&other)
                    )))
                }
            }
        }

        Ok(inputs)
    }
}

// Inputs may carry the password; only keys are printed.
impl fmt::Debug for Inputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inputs")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Parse a `key=value` assignment
///
/// The value may be empty and may itself contain `=`.
pub fn parse_assignment(assignment: &str) -> Result<(String, String)> {
    let (key, value) = assignment.split_once('=').ok_or_else(|| {
        ProviderError::invalid_input(format!(
            "Expected key=value, got '{}'",
            assignment
        ))
    })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ProviderError::invalid_input(format!(
            "Missing key in assignment '{}'",
            assignment
        )));
    }

    Ok((key.to_string(), value.to_string()))
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "table",
    }
}
