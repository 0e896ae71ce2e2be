//! Resolve command handler

use crate::cli::ResolveArgs;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use configkit_core::ConfigGroup;
use serde_json::Value;
use tracing::{info, instrument};

/// Handle the resolve command
#[instrument(skip_all, fields(name = ?args.name, raw = args.raw))]
pub fn handle_resolve(args: ResolveArgs, settings: &Settings, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("resolve_command");
    let settings = settings.clone().with_group_args(&args.group);
    output.info(&format!(
        "Resolving {} against {}",
        settings.config_dir.display(),
        settings.schema_dir.display()
    ))?;

    let group = settings.config_group()?;
    info!(configs = group.len(), "Config group resolved");

    let mut value = select(&group, args.name.as_deref(), args.raw)?;
    if !args.show_secrets {
        redaction::redact_json_value(&mut value);
    }
    output.value(&value)
}

fn select(group: &ConfigGroup, name: Option<&str>, raw: bool) -> Result<Value> {
    let not_found = |name: &str| Error::ConfigNotFound {
        name: name.to_string(),
    };
    match (name, raw) {
        (None, true) => Ok(group.configs().clone()),
        (None, false) => Ok(group.to_value()?),
        (Some(name), true) => group.configs().get(name).cloned().ok_or_else(|| not_found(name)),
        (Some(name), false) => match group.get(name)? {
            Some(resolved) => Ok(resolved.to_value()?),
            None => Err(not_found(name)),
        },
    }
}
