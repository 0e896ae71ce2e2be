//! Config document formats and text decoding
//!
//! Each format is bound to a parser function that is absent when its cargo
//! feature is disabled, so callers learn about a missing parser before any
//! file is read.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::error::{SchemaError, SchemaResult};
use serde_json::Value;
use std::path::Path;

/// Parser bound to a format
pub type ParseFn = fn(&str, &Path) -> SchemaResult<Value>;

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Json, Format::Yaml, Format::Toml];

    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
            Format::Toml => &["toml"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
        }
    }

    /// Cargo feature that compiles this format's parser in
    pub fn feature(&self) -> Option<&'static str> {
        match self {
            Format::Json => None,
            Format::Yaml => Some("yaml"),
            Format::Toml => Some("toml"),
        }
    }

    /// The parser for this format, or `None` when it was compiled out
    pub fn parser(&self) -> Option<ParseFn> {
        match self {
            Format::Json => Some(parse_json),
            #[cfg(feature = "yaml")]
            Format::Yaml => Some(parse_yaml),
            #[cfg(feature = "toml")]
            Format::Toml => Some(parse_toml),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Resolve the parser for `path`, distinguishing unknown extensions from
    /// formats whose parser is unavailable
    pub fn parser_for(path: &Path) -> SchemaResult<ParseFn> {
        let format = Self::from_path(path).ok_or_else(|| SchemaError::unsupported_format(path))?;
        format.require(format.parser(), path)
    }

    fn require(&self, parser: Option<ParseFn>, path: &Path) -> SchemaResult<ParseFn> {
        parser.ok_or_else(|| {
            SchemaError::missing_dependency(path, self.name(), self.feature().unwrap_or_default())
        })
    }
}

fn parse_json(content: &str, path: &Path) -> SchemaResult<Value> {
    serde_json::from_str(content).map_err(|e| SchemaError::json_parse_error(path, e))
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str, path: &Path) -> SchemaResult<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    // Parse as YAML first so YAML-specific errors keep their location
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| SchemaError::YamlParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    serde_json::to_value(yaml_value).map_err(|e| SchemaError::json_parse_error(path, e))
}

#[cfg(feature = "toml")]
fn parse_toml(content: &str, path: &Path) -> SchemaResult<Value> {
    let table: toml::Table = toml::from_str(content).map_err(|e| SchemaError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::to_value(table).map_err(|e| SchemaError::json_parse_error(path, e))
}

/// Text encoding used to decode a config file before parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "Latin-1",
        }
    }

    /// Decode raw file bytes, stripping a UTF-8 byte order mark
    pub fn decode(&self, bytes: Vec<u8>, path: &Path) -> SchemaResult<String> {
        match self {
            TextEncoding::Utf8 => {
                let mut text = String::from_utf8(bytes).map_err(|e| SchemaError::DecodeError {
                    path: path.to_path_buf(),
                    encoding: self.name(),
                    reason: e.to_string(),
                })?;
                if text.starts_with('\u{feff}') {
                    text.drain(..'\u{feff}'.len_utf8());
                }
                Ok(text)
            }
            TextEncoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }
}
