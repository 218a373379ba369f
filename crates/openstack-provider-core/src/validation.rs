//! Validation gates
//!
//! Both gates are fail-fast: they stop at the first violation in
//! declaration order and report only that one.

use crate::error::{ProviderError, Result};
use crate::resolver::ResolvedSettings;
use crate::schema::{IdentityGroup, Schema};

/// Check that every required setting resolved to a non-empty value
pub fn validate_required(resolved: &ResolvedSettings, schema: &Schema) -> Result<()> {
    if let Some(setting) = schema
        .iter()
        .filter(|s| s.required)
        .find(|s| resolved.get(s.key).is_empty())
    {
        tracing::debug!(key = setting.key, "Required setting is empty");
        return Err(ProviderError::MissingRequiredSetting {
            key: setting.key.to_string(),
            env_var: setting.env_var.to_string(),
        });
    }
    Ok(())
}

/// Check that each identity group has at least one non-empty member
///
/// Setting more than one member of a group is allowed.
pub fn validate_exclusive_groups(resolved: &ResolvedSettings, groups: &[IdentityGroup]) -> Result<()> {
    for group in groups {
        let satisfied = group.members.iter().any(|m| !resolved.get(m).is_empty());
        if !satisfied {
            tracing::debug!(group = group.name, "No member of identity group is set");
            return Err(ProviderError::MissingRequiredGroup {
                group: group.name.to_string(),
                members: group.members.iter().map(|m| m.to_string()).collect(),
            });
        }
    }
    Ok(())
}
