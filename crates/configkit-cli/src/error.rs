//! Error types and handling for the CLI
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use configkit_schemas::SchemaError;
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (writing output, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from configkit-core
    #[error(transparent)]
    Core(#[from] configkit_core::Error),

    /// Error from configkit-schemas
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// No schema with the requested name
    #[error("No schema named '{name}'")]
    SchemaNotFound { name: String },

    /// The resolved group has no entry with this name
    #[error("No config named '{name}'")]
    ConfigNotFound { name: String },

    /// Schemas exist for the name but none satisfies the specifier
    #[error("No version of schema '{name}' satisfies '{specifier}'")]
    NoCompatibleVersion { name: String, specifier: String },

    /// A config file failed validation; the violations were already printed
    #[error("Validation of {} failed with {count} violation(s)", path.display())]
    ValidationFailed { path: PathBuf, count: usize },

    /// Settings error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(err) if err.is_substitution_error() => 3,
            Self::Core(_) | Self::Schema(_) => 2,
            Self::FileNotFound { .. } => 4,
            Self::SchemaNotFound { .. }
            | Self::ConfigNotFound { .. }
            | Self::NoCompatibleVersion { .. } => 5,
            Self::ValidationFailed { .. } => 6,
            Self::Config(_) => 7,
            Self::InvalidArgs(_) => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_failure_kind() {
        let substitution = Error::Core(configkit_core::Error::UnresolvedPath {
            path: "a.b".to_string(),
        });
        let not_mapping = Error::Core(configkit_core::Error::NotAMapping {
            name: "base".to_string(),
        });
        let failed = Error::ValidationFailed {
            path: PathBuf::from("server.json"),
            count: 2,
        };

        assert_eq!(substitution.exit_code(), 3);
        assert_eq!(not_mapping.exit_code(), 2);
        assert_eq!(failed.exit_code(), 6);
        assert_eq!(Error::other("x").exit_code(), 99);
    }

    #[test]
    fn test_format_error_without_color() {
        let err = Error::SchemaNotFound {
            name: "server".to_string(),
        };
        assert_eq!(format_error(&err, false), "Error: No schema named 'server'");
        assert!(Error::invalid_args("x").should_show_help());
        assert!(!err.should_show_help());
    }
}
