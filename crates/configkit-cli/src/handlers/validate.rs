//! Validation command handler

use crate::cli::ValidateArgs;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use configkit_schemas::{LoadOptions, SchemaError};
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip_all, fields(name = %args.name, file = %args.file.display()))]
pub fn handle_validate(args: ValidateArgs, settings: &Settings, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("file: {}", args.file.display()));
    let settings = settings.clone().with_schema_args(&args.schema);

    if !args.file.is_file() {
        return Err(Error::FileNotFound {
            path: args.file.clone(),
        });
    }

    let directory = settings.directory()?;
    let specifier = settings.version_spec()?;
    let versions = directory.get(&args.name)?.ok_or_else(|| Error::SchemaNotFound {
        name: args.name.clone(),
    })?;
    let schema = versions
        .newest(Some(&specifier), settings.match_unversioned)
        .ok_or_else(|| Error::NoCompatibleVersion {
            name: args.name.clone(),
            specifier: specifier.to_string(),
        })?;
    debug!(schema = ?schema.id(), version = ?schema.version(), "Selected schema");

    output.info(&format!(
        "Validating {} against {}",
        args.file.display(),
        schema.id().unwrap_or(&args.name)
    ))?;

    let options = LoadOptions::default().with_encoding(settings.encoding()?);
    match schema.load_with(&args.file, options) {
        Ok(mut value) => {
            info!("Validation completed successfully");
            output.success("✓ Config is valid")?;

            if args.detailed {
                output.section("Config")?;
                redaction::redact_json_value(&mut value);
                output.value(&value)?;
            }
            Ok(())
        }
        Err(SchemaError::ValidationError { path, failure }) => {
            warn!(count = failure.violations.len(), "Validation failed");
            output.error("✗ Config validation failed")?;
            output.validation_failure(&failure)?;
            Err(Error::ValidationFailed {
                path,
                count: failure.violations.len(),
            })
        }
        Err(err) => Err(err.into()),
    }
}
