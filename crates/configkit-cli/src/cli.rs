//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// configkit - versioned, schema-validated configuration directories
///
/// Discovers JSON Schemas in a schema tree, picks the newest compatible
/// version for every config file, and resolves `${{path}}` placeholders
/// across the whole directory.
#[derive(Parser, Debug)]
#[command(
    name = "configkit",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a configkit settings file
    #[arg(short, long, global = true, env = "CONFIGKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List discovered schemas with their versions
    Schemas(SchemasArgs),

    /// Resolve every config in the config directory
    Resolve(ResolveArgs),

    /// Validate one file against the newest compatible schema for a name
    Validate(ValidateArgs),

    /// Evaluate a path against the resolved configs
    Get(GetArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Where schemas live and which versions are acceptable
#[derive(Args, Debug, Clone, Default)]
pub struct SchemaArgs {
    /// Root of the schema tree
    #[arg(long, value_name = "DIR", env = "CONFIGKIT_SCHEMA_DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Version specifier schemas must satisfy (e.g. ">=1.0,<2")
    #[arg(long, value_name = "SPEC")]
    pub version_spec: Option<String>,
}

/// Where config files live and how the group is assembled
#[derive(Args, Debug, Clone, Default)]
pub struct GroupArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Directory holding `<schema-name>.<ext>` config files
    #[arg(long, value_name = "DIR", env = "CONFIGKIT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Config whose top-level keys are copied into the group's top level
    #[arg(long = "default", value_name = "NAME")]
    pub default: Option<String>,
}

/// Arguments for the schemas command
#[derive(Parser, Debug)]
pub struct SchemasArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Only list schemas with this name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub group: GroupArgs,

    /// Only print this config
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Print configs as loaded, without substituting placeholders
    #[arg(long)]
    pub raw: bool,

    /// Print values of keys that look like secrets
    #[arg(long)]
    pub show_secrets: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Schema name to validate against
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Config file (JSON, YAML or TOML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Print the loaded config after validating
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the get command
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// JSONPath into the group, with or without the leading `$.`
    #[arg(value_name = "PATH")]
    pub path: String,

    #[command(flatten)]
    pub group: GroupArgs,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["configkit", "-vv", "schemas"]);
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::parse_from(["configkit", "--quiet", "schemas"]);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_group_flags() {
        let cli = Cli::parse_from([
            "configkit",
            "get",
            "server.host",
            "--schema-dir",
            "s",
            "--config-dir",
            "c",
            "--version-spec",
            "<2",
            "--default",
            "base",
            "-o",
            "json-pretty",
        ]);
        assert_eq!(cli.output, OutputFormat::JsonPretty);
        let Commands::Get(args) = cli.command else {
            panic!("expected get");
        };
        assert_eq!(args.path, "server.host");
        assert_eq!(args.group.schema.schema_dir, Some(PathBuf::from("s")));
        assert_eq!(args.group.schema.version_spec.as_deref(), Some("<2"));
        assert_eq!(args.group.config_dir, Some(PathBuf::from("c")));
        assert_eq!(args.group.default.as_deref(), Some("base"));
    }

    #[test]
    fn test_validate_positionals() {
        let cli = Cli::parse_from(["configkit", "validate", "server", "server.yaml", "--detailed"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.name, "server");
        assert_eq!(args.file, PathBuf::from("server.yaml"));
        assert!(args.detailed);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["configkit", "-q", "-v", "schemas"]).is_err());
    }
}
