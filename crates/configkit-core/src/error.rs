//! Error types for config resolution and substitution
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::jsonpath::JSONPathError;
use configkit_schemas::SchemaError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for configkit-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Discovery, loading or validation failed in the schema layer
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A placeholder or lookup path is not valid JSONPath
    #[error("JSONPath error: {0}")]
    JsonPath(#[from] JSONPathError),

    /// Resolving a placeholder led back to a path already being resolved
    #[error("Cyclic substitution on: {path} (via {})", chain.join(" -> "))]
    CyclicSubstitution { path: String, chain: Vec<String> },

    /// A multi-element selection was embedded in surrounding text
    #[error("Cannot substitute slice '{path}' unless the substitution occupies the entire value: {value}")]
    SliceNotWholeValue { path: String, value: String },

    /// A placeholder path selected nothing
    #[error("Substitution path matched nothing: {path}")]
    UnresolvedPath { path: String },

    /// A config file exists but no schema version satisfies the specifier
    #[error("No version of schema '{name}' matches '{specifier}' for {}", path.display())]
    NoCompatibleSchema {
        name: String,
        specifier: String,
        path: PathBuf,
    },

    /// The default config must be a mapping to be flattened into the top level
    #[error("Default config '{name}' is not a mapping")]
    NotAMapping { name: String },

    /// IO errors while listing the config directory
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io_error(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            message: format!("Failed to read config directory {}", path.display()),
            source,
        }
    }

    pub fn cyclic(path: impl Into<String>, chain: &[String]) -> Self {
        Self::CyclicSubstitution {
            path: path.into(),
            chain: chain.to_vec(),
        }
    }

    /// Whether this error came from misusing placeholders rather than from IO or validation
    pub fn is_substitution_error(&self) -> bool {
        matches!(
            self,
            Self::CyclicSubstitution { .. }
                | Self::SliceNotWholeValue { .. }
                | Self::UnresolvedPath { .. }
                | Self::JsonPath(_)
        )
    }

    /// The schema-layer error, if this wraps one
    pub fn schema_error(&self) -> Option<&SchemaError> {
        match self {
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }
}
