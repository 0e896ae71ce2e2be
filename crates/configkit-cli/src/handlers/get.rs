//! Get command handler

use crate::cli::GetArgs;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::instrument;

/// Handle the get command
#[instrument(skip_all, fields(path = %args.path))]
pub fn handle_get(args: GetArgs, settings: &Settings, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("get_command", &args.path);
    if args.path.trim().is_empty() {
        return Err(Error::invalid_args("PATH must not be empty; use `resolve` for the whole group"));
    }

    let settings = settings.clone().with_group_args(&args.group);
    let group = settings.config_group()?;
    let value = group.resolve_path(args.path.trim())?.to_value()?;
    output.value(&value)
}
