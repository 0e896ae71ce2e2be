//! Settings for the CLI
//!
//! Settings are merged from, lowest precedence first:
//! - Default values
//! - A settings file (TOML, YAML or JSON)
//! - Command-line arguments
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::cli::{GroupArgs, SchemaArgs};
use crate::error::{Error, Result};
use configkit_core::ConfigGroup;
use configkit_schemas::{
    name_version_matcher, version_name_matcher, RegexMatcher, SchemaDirectory, TextEncoding,
    VersionSpecifier,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Root of the schema tree
    pub schema_dir: PathBuf,

    /// Directory holding the config files
    pub config_dir: PathBuf,

    /// Version specifier schemas must satisfy; any version when unset
    pub version_spec: Option<String>,

    /// Config whose top-level keys are flattened into the group
    pub default: Option<String>,

    /// `version-name`, `name-version`, or a regex with a `name` group
    pub matcher: String,

    /// Whether unversioned schemas may be picked
    pub match_unversioned: bool,

    /// Text encoding of config files (`utf-8` or `latin-1`)
    pub encoding: String,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error); verbosity flags win
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Per-module levels, e.g. `configkit_schemas = "debug"`
    pub modules: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schemas"),
            config_dir: PathBuf::from("config"),
            version_spec: None,
            default: None,
            matcher: "version-name".to_string(),
            match_unversioned: true,
            encoding: "utf-8".to_string(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a file, choosing the parser by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let settings = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::config(format!(
                    "Unsupported settings file {}: expected .toml, .yaml, .yml or .json",
                    path.display()
                )))
            }
        };

        debug!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Load settings from the first default location that exists
    pub fn load() -> Result<Self> {
        match Self::default_settings_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Default settings file paths to check
    fn default_settings_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("configkit.toml"),
            PathBuf::from(".configkit.toml"),
            PathBuf::from(".configkit.yaml"),
            PathBuf::from(".configkit.yml"),
            PathBuf::from(".configkit.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let configkit_dir = config_dir.join("configkit");
            paths.push(configkit_dir.join("config.toml"));
            paths.push(configkit_dir.join("config.yaml"));
            paths.push(configkit_dir.join("config.json"));
        }

        paths
    }

    /// Apply schema flags given on the command line
    pub fn with_schema_args(mut self, args: &SchemaArgs) -> Self {
        if let Some(dir) = &args.schema_dir {
            self.schema_dir = dir.clone();
        }
        if let Some(spec) = &args.version_spec {
            self.version_spec = Some(spec.clone());
        }
        self
    }

    /// Apply schema and config flags given on the command line
    pub fn with_group_args(self, args: &GroupArgs) -> Self {
        let mut settings = self.with_schema_args(&args.schema);
        if let Some(dir) = &args.config_dir {
            settings.config_dir = dir.clone();
        }
        if let Some(name) = &args.default {
            settings.default = Some(name.clone());
        }
        settings
    }

    pub fn directory(&self) -> Result<SchemaDirectory> {
        let directory = match self.matcher.as_str() {
            "version-name" => SchemaDirectory::with_matcher(&self.schema_dir, version_name_matcher()),
            "name-version" => SchemaDirectory::with_matcher(&self.schema_dir, name_version_matcher()),
            pattern => SchemaDirectory::with_matcher(&self.schema_dir, RegexMatcher::new(pattern)?),
        };
        Ok(directory)
    }

    pub fn version_spec(&self) -> Result<VersionSpecifier> {
        match &self.version_spec {
            Some(spec) => Ok(VersionSpecifier::parse(spec)?),
            None => Ok(VersionSpecifier::any()),
        }
    }

    pub fn encoding(&self) -> Result<TextEncoding> {
        match self.encoding.to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            other => Err(Error::config(format!("Unknown encoding '{}'", other))),
        }
    }

    /// Build and resolve the config group these settings describe
    pub fn config_group(&self) -> Result<ConfigGroup> {
        let mut builder = ConfigGroup::builder(self.directory()?, &self.config_dir)
            .version_spec(self.version_spec()?)
            .match_unversioned(self.match_unversioned)
            .encoding(self.encoding()?);
        if let Some(name) = &self.default {
            builder = builder.default_name(name.clone());
        }
        Ok(builder.build()?)
    }
}
