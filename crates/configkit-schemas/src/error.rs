//! Error types for schema discovery, loading and validation
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::validation::ValidationFailure;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while scanning a schema tree or loading a config file
#[derive(Error, Debug)]
pub enum SchemaError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory walk errors
    #[error("Failed to walk schema directory '{path}': {source}")]
    WalkError {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// JSON parsing errors
    #[error("Failed to parse JSON file '{path}': {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[cfg(feature = "yaml")]
    #[error("Failed to parse YAML file '{path}': {source}")]
    YamlParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// TOML parsing errors
    #[cfg(feature = "toml")]
    #[error("Failed to parse TOML file '{path}': {source}")]
    TomlParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Errors reported by a caller-supplied parser
    #[error("Custom parser failed for '{path}': {reason}")]
    CustomParseError { path: PathBuf, reason: String },

    /// The file could not be decoded with the requested text encoding
    #[error("Failed to decode '{path}' as {encoding}: {reason}")]
    DecodeError {
        path: PathBuf,
        encoding: &'static str,
        reason: String,
    },

    /// Extension has no registered parser and no override was given
    #[error("Unsupported file format for '{path}'. Expected .json, .yaml, .yml or .toml, or pass an explicit parser")]
    UnsupportedFormat { path: PathBuf },

    /// Format is known but its parser was compiled out
    #[error("Loading '{path}' requires {format} support. Rebuild configkit-schemas with the `{feature}` feature enabled")]
    MissingDependency {
        path: PathBuf,
        format: &'static str,
        feature: &'static str,
    },

    /// Instance does not satisfy its schema
    #[error("Validation failed for '{path}': {failure}")]
    ValidationError {
        path: PathBuf,
        failure: ValidationFailure,
    },

    /// The schema definition itself could not be compiled
    #[error("Schema '{id}' could not be compiled: {reason}")]
    InvalidSchema { id: String, reason: String },

    /// Malformed version specifier
    #[error("Invalid version specifier '{specifier}': {reason}")]
    InvalidSpecifier { specifier: String, reason: String },

    /// Matcher pattern rejected
    #[error("Invalid matcher pattern '{pattern}': {reason}")]
    InvalidMatcher { pattern: String, reason: String },
}

impl SchemaError {
    /// Create an I/O error with path context
    pub fn io_error(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source: error,
        }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: impl Into<PathBuf>, error: serde_json::Error) -> Self {
        Self::JsonParseError {
            path: path.into(),
            source: error,
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        Self::UnsupportedFormat { path: path.into() }
    }

    /// Create a missing optional dependency error
    pub fn missing_dependency(
        path: impl Into<PathBuf>,
        format: &'static str,
        feature: &'static str,
    ) -> Self {
        Self::MissingDependency {
            path: path.into(),
            format,
            feature,
        }
    }

    /// Create a validation error
    pub fn validation_error(path: impl Into<PathBuf>, failure: ValidationFailure) -> Self {
        Self::ValidationError {
            path: path.into(),
            failure,
        }
    }

    /// Create an invalid specifier error
    pub fn invalid_specifier(specifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpecifier {
            specifier: specifier.into(),
            reason: reason.into(),
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::IoError { path, .. }
            | Self::WalkError { path, .. }
            | Self::JsonParseError { path, .. }
            | Self::CustomParseError { path, .. }
            | Self::DecodeError { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::MissingDependency { path, .. }
            | Self::ValidationError { path, .. } => Some(path),
            #[cfg(feature = "yaml")]
            Self::YamlParseError { path, .. } => Some(path),
            #[cfg(feature = "toml")]
            Self::TomlParseError { path, .. } => Some(path),
            Self::InvalidSchema { .. }
            | Self::InvalidSpecifier { .. }
            | Self::InvalidMatcher { .. } => None,
        }
    }

    /// Validation details, when this is a validation failure
    pub fn validation_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::ValidationError { failure, .. } => Some(failure),
            _ => None,
        }
    }
}
