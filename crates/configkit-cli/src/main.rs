//! configkit CLI - inspect, resolve and validate versioned config directories
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Settings;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    // Settings are read before logging so their `[logging]` table applies
    let settings = Settings::load_with_file(cli.config.as_deref());

    if let Err(e) = init_logging(&cli, settings.as_ref().ok()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = settings.and_then(|settings| run(cli, settings));

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
fn run(cli: Cli, settings: Settings) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Schemas(args) => handlers::handle_schemas(args, &settings, &mut output),
        Commands::Resolve(args) => handlers::handle_resolve(args, &settings, &mut output),
        Commands::Validate(args) => handlers::handle_validate(args, &settings, &mut output),
        Commands::Get(args) => handlers::handle_get(args, &settings, &mut output),
        Commands::Completions(args) => handlers::handle_completions(args, &mut std::io::stdout()),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, settings: Option<&Settings>) -> Result<()> {
    let verbosity = cli.verbosity_level();
    let mut logging_config = LoggingConfig::from_verbosity(verbosity);

    if let Some(settings) = settings {
        logging_config.merge_with_settings(&settings.logging, verbosity);
    }
    logging_config.merge_with_env();

    // Quiet mode only logs errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["configkit", "schemas"]);
        assert_eq!(cli.verbosity_level(), 0);

        let cli = Cli::parse_from(["configkit", "-vv", "validate", "server", "server.json"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["configkit", "--quiet", "resolve", "--raw"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(matches!(cli.command, Commands::Resolve(ref args) if args.raw));
    }
}
