//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use soliddns_core::descriptor::{self, EntityDescriptor};
use soliddns_core::{EntityConfig, LocalId};

use crate::cli::ResourceArgs;
use crate::error::CliError;

/// Look up a resource type by name or alias.
pub fn descriptor(name: &str) -> Result<&'static EntityDescriptor, CliError> {
    descriptor::lookup(name).ok_or_else(|| CliError::UnknownResource {
        name: name.into(),
        available: descriptor::all()
            .iter()
            .map(|d| d.alias)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// The `--id` flag, required by every command but create.
pub fn require_id(args: &ResourceArgs, action: &str) -> Result<LocalId, CliError> {
    match args.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Ok(LocalId::new(id)),
        _ => Err(CliError::Validation {
            field: "id".into(),
            reason: format!("--id is required to {action} an object"),
        }),
    }
}

/// Merge `--from-file` and `-f key=value` into one configuration.
///
/// Flags override file values. Every key must name a field of `desc`.
pub fn collect_fields(
    desc: &EntityDescriptor,
    args: &ResourceArgs,
) -> Result<EntityConfig, CliError> {
    let mut config = match args.from_file {
        Some(ref path) => config_from_json(&read_json_file(path)?)?,
        None => EntityConfig::new(),
    };
    config.extend(args.fields.iter().cloned());

    if let Some((unknown, _)) = config.iter().find(|(k, _)| desc.field(k).is_none()) {
        return Err(CliError::Validation {
            field: unknown.into(),
            reason: format!(
                "not a {} field (expected one of: {})",
                desc.label,
                desc.fields
                    .iter()
                    .map(|f| f.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        });
    }
    Ok(config)
}

/// Flatten a JSON object of scalars into an `EntityConfig`.
fn config_from_json(value: &serde_json::Value) -> Result<EntityConfig, CliError> {
    let object = value.as_object().ok_or_else(|| CliError::Validation {
        field: "from-file".into(),
        reason: "expected a JSON object of field values".into(),
    })?;

    let mut config = EntityConfig::new();
    for (key, value) in object {
        let text = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => continue,
            _ => {
                return Err(CliError::Validation {
                    field: key.clone(),
                    reason: "nested values are not supported".into(),
                });
            }
        };
        config.set(key.clone(), text);
    }
    Ok(config)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `action` is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}
