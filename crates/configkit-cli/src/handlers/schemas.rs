//! Schemas command handler

use crate::cli::{OutputFormat, SchemasArgs};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use configkit_schemas::version_sort_key;
use serde::Serialize;
use tracing::{debug, instrument};

/// One discovered schema version
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaRow {
    pub name: String,
    pub version: Option<String>,
    pub id: Option<String>,
}

/// Handle the schemas command
#[instrument(skip_all, fields(name = ?args.name))]
pub fn handle_schemas(args: SchemasArgs, settings: &Settings, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("schemas_command");
    let settings = settings.clone().with_schema_args(&args.schema);
    let rows = list_schemas(&settings, args.name.as_deref())?;

    if output.format() != OutputFormat::Human {
        return output.data(&rows);
    }

    output.info(&format!("Schemas under {}", settings.schema_dir.display()))?;
    let table = rows
        .iter()
        .map(|row| {
            vec![
                row.name.clone(),
                row.version.clone().unwrap_or_else(|| "-".to_string()),
                row.id.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    output.table(&["NAME", "VERSION", "ID"], table)?;
    output.success(&format!("{} schema version(s)", rows.len()))
}

/// Every schema version matching the settings, newest first within a name
pub fn list_schemas(settings: &Settings, only: Option<&str>) -> Result<Vec<SchemaRow>> {
    let directory = settings.directory()?;
    let specifier = settings.version_spec()?;

    directory.with_cache(|directory| -> Result<Vec<SchemaRow>> {
        if let Some(name) = only {
            if !directory.contains(name)? {
                return Err(Error::SchemaNotFound {
                    name: name.to_string(),
                });
            }
        }

        let mut rows = Vec::new();
        for (name, versions) in directory.iter()? {
            if only.is_some_and(|wanted| wanted != name) {
                continue;
            }
            let versions = versions
                .filtered(&specifier, settings.match_unversioned)
                .sorted(&version_sort_key, true);
            debug!(name = %name, versions = versions.len(), "Listing schema");
            rows.extend(versions.iter().map(|schema| SchemaRow {
                name: name.clone(),
                version: schema.version().map(str::to_string),
                id: schema.id().map(str::to_string),
            }));
        }
        Ok(rows)
    })
}
