//! Output formatting for the provider CLI
//!
//! Every command result can be rendered as a colored table, JSON or YAML.
//! Secret settings are redacted before any of these structures are built.

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

use openstack_provider_core::{
    IdentityGroup, OpenStackClient, ResolvedConfiguration, ResolvedSettings, Schema,
};

use crate::error::Result;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table format with colors
    #[default]
    Table,
    /// JSON format for machine processing
    Json,
    /// YAML format
    Yaml,
}

/// Render a serializable value as JSON, or YAML for any other format
fn write_serialized<T: Serialize, W: Write>(value: &T, format: OutputFormat, out: &mut W) -> Result<()> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    } else {
        write!(out, "{}", serde_yaml::to_string(value)?)?;
    }
    Ok(())
}

fn write_header<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.cyan().bold())?;
    writeln!(out, "{}", "=".repeat(60))?;
    Ok(())
}

/// A single setting definition
#[derive(Debug, Clone, Serialize)]
pub struct SchemaEntry {
    pub key: String,
    pub env_var: String,
    pub required: bool,
    pub secret: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub description: String,
}

/// An identity group definition
#[derive(Debug, Clone, Serialize)]
pub struct GroupEntry {
    pub name: String,
    pub members: Vec<String>,
}

/// Output of the `schema` command
#[derive(Debug, Clone, Serialize)]
pub struct SchemaOutput {
    pub provider: String,
    pub settings: Vec<SchemaEntry>,
    pub identity_groups: Vec<GroupEntry>,
}

impl SchemaOutput {
    pub fn new(schema: &Schema, groups: &[IdentityGroup]) -> Self {
        Self {
            provider: openstack_provider_core::PROVIDER_NAME.to_string(),
            settings: schema
                .iter()
                .map(|s| SchemaEntry {
                    key: s.key.to_string(),
                    env_var: s.env_var.to_string(),
                    required: s.required,
                    secret: s.secret,
                    default: s.default.map(str::to_string),
                    description: s.description.to_string(),
                })
                .collect(),
            identity_groups: groups
                .iter()
                .map(|g| GroupEntry {
                    name: g.name.to_string(),
                    members: g.members.iter().map(|m| m.to_string()).collect(),
                })
                .collect(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<()> {
        let mut stdout = io::stdout();
        self.render_to(&mut stdout, format)?;
        stdout.flush()?;
        Ok(())
    }

    pub fn render_to<W: Write>(&self, out: &mut W, format: OutputFormat) -> Result<()> {
        if format != OutputFormat::Table {
            return write_serialized(self, format, out);
        }

        write_header(out, &format!("{} provider settings", self.provider))?;
        writeln!(
            out,
            "{:<28} {:<24} {:<9} {:<8}",
            "KEY".dimmed(),
            "ENV VAR".dimmed(),
            "REQUIRED".dimmed(),
            "DEFAULT".dimmed()
        )?;
        for entry in &self.settings {
            let required = if entry.required { "yes".yellow() } else { "no".normal() };
            writeln!(
                out,
                "{:<28} {:<24} {:<9} {:<8} {}",
                entry.key,
                entry.env_var,
                required,
                entry.default.as_deref().unwrap_or("-"),
                entry.description.dimmed()
            )?;
        }

        writeln!(out)?;
        writeln!(out, "{}", "Identity groups (at least one member required):".cyan().bold())?;
        for group in &self.identity_groups {
            writeln!(out, "  {:<8} {}", group.name, group.members.join(" | "))?;
        }
        Ok(())
    }
}

/// A single resolved setting, secrets redacted
#[derive(Debug, Clone, Serialize)]
pub struct SettingOutput {
    pub key: String,
    pub value: String,
    pub source: String,
}

impl SettingOutput {
    fn from_resolved(resolved: &ResolvedSettings) -> Vec<Self> {
        resolved
            .iter()
            .map(|e| SettingOutput {
                key: e.key.to_string(),
                value: e.display_value().to_string(),
                source: e.source.to_string(),
            })
            .collect()
    }
}

/// Output of the `resolve` and `validate` commands
#[derive(Debug, Clone, Serialize)]
pub struct ResolveOutput {
    /// Whether validation passed
    pub valid: bool,
    /// Validation failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Resolved settings; omitted by `validate`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<SettingOutput>,
}

impl ResolveOutput {
    /// Build from resolved settings and the validation outcome
    pub fn new(resolved: &ResolvedSettings, error: Option<String>) -> Self {
        Self {
            valid: error.is_none(),
            error,
            settings: SettingOutput::from_resolved(resolved),
        }
    }

    /// Drop the settings listing, keeping only the verdict
    pub fn summary_only(mut self) -> Self {
        self.settings.clear();
        self
    }

    pub fn render(&self, format: OutputFormat) -> Result<()> {
        let mut stdout = io::stdout();
        self.render_to(&mut stdout, format)?;
        stdout.flush()?;
        Ok(())
    }

    pub fn render_to<W: Write>(&self, out: &mut W, format: OutputFormat) -> Result<()> {
        if format != OutputFormat::Table {
            return write_serialized(self, format, out);
        }

        if !self.settings.is_empty() {
            write_header(out, "Resolved settings")?;
            for setting in &self.settings {
                let source = match setting.source.as_str() {
                    "explicit" => setting.source.green(),
                    "environment" => setting.source.blue(),
                    "default" => setting.source.yellow(),
                    _ => setting.source.dimmed(),
                };
                writeln!(out, "{:<28} {:<12} {}", setting.key, source, setting.value)?;
            }
        }

        writeln!(out)?;
        match &self.error {
            None => writeln!(out, "{} {}", "+".green(), "Configuration is valid")?,
            Some(error) => writeln!(out, "{} {}", "x".red(), error.red())?,
        }
        Ok(())
    }
}

/// Output of the `configure` command
#[derive(Debug, Clone, Serialize)]
pub struct ConfigureOutput {
    pub identity_endpoint: String,
    pub compute_api_version: String,
    pub block_storage_api_version: String,
    pub networking_api_version: String,
    pub object_storage_api_version: String,
}

impl ConfigureOutput {
    pub fn new(configuration: &ResolvedConfiguration<OpenStackClient>) -> Self {
        let client = configuration.client();
        let versions = client.versions();
        Self {
            identity_endpoint: client.display_endpoint(),
            compute_api_version: versions.compute.to_string(),
            block_storage_api_version: versions.block_storage.to_string(),
            networking_api_version: versions.networking.to_string(),
            object_storage_api_version: versions.object_storage.to_string(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<()> {
        let mut stdout = io::stdout();
        self.render_to(&mut stdout, format)?;
        stdout.flush()?;
        Ok(())
    }

    pub fn render_to<W: Write>(&self, out: &mut W, format: OutputFormat) -> Result<()> {
        if format != OutputFormat::Table {
            return write_serialized(self, format, out);
        }

        write_header(out, "Client prepared")?;
        writeln!(out, "{:<28} {}", "identity endpoint", self.identity_endpoint.cyan())?;
        writeln!(out, "{:<28} {}", "compute API", self.compute_api_version)?;
        writeln!(out, "{:<28} {}", "block storage API", self.block_storage_api_version)?;
        writeln!(out, "{:<28} {}", "networking API", self.networking_api_version)?;
        writeln!(out, "{:<28} {}", "object storage API", self.object_storage_api_version)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openstack_provider_core::{keys, resolve, schema::openstack_groups, EnvSnapshot, Inputs};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_resolve_output_redacts_password() {
        let inputs = Inputs::new()
            .with(keys::PASSWORD, "hunter2")
            .with(keys::USERNAME, "alice");
        let resolved = resolve(&inputs, &Schema::openstack(), &EnvSnapshot::new());
        let output = ResolveOutput::new(&resolved, None);

        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Yaml] {
            let text = render(|buf| output.render_to(buf, format));
            assert!(!text.contains("hunter2"), "{format:?} leaked the password");
            assert!(text.contains("alice"));
        }
    }

    #[test]
    fn test_resolve_output_json_shape() {
        let resolved = resolve(&Inputs::new(), &Schema::openstack(), &EnvSnapshot::new());
        let output = ResolveOutput::new(&resolved, Some("At least one of user_id or username must be specified".into()));

        let text = render(|buf| output.render_to(buf, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["valid"], false);
        assert_eq!(value["settings"].as_array().unwrap().len(), 12);
        assert_eq!(value["settings"][8]["key"], "compute_api_version");
        assert_eq!(value["settings"][8]["source"], "default");
    }

    #[test]
    fn test_summary_only_omits_settings() {
        let resolved = resolve(&Inputs::new(), &Schema::openstack(), &EnvSnapshot::new());
        let output = ResolveOutput::new(&resolved, None).summary_only();

        let text = render(|buf| output.render_to(buf, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("settings").is_none());
        assert_eq!(value["valid"], true);
    }

    #[test]
    fn test_schema_output() {
        let output = SchemaOutput::new(&Schema::openstack(), &openstack_groups());
        assert_eq!(output.settings.len(), 12);
        assert_eq!(output.identity_groups.len(), 2);

        let table = render(|buf| output.render_to(buf, OutputFormat::Table));
        assert!(table.contains("OS_VOLUME_API_VERSION"));
        assert!(table.contains("tenant_id | tenant_name"));

        let yaml = render(|buf| output.render_to(buf, OutputFormat::Yaml));
        assert!(yaml.contains("env_var: OS_AUTH_URL"));
    }
}
