//! Matchers decide which files under a schema root are schema definitions
//!
//! A matcher receives the file path relative to the schema root, always
//! `/`-separated, and returns the schema name and optional version it
//! encodes.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::error::{SchemaError, SchemaResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Name and version extracted from a schema file path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub name: String,
    pub version: Option<String>,
}

impl SchemaInfo {
    pub fn new(name: impl Into<String>, version: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            version: version.map(Into::into),
        }
    }

    /// Info for a schema that carries no version
    pub fn unversioned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }
}

impl fmt::Display for SchemaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Checks whether a relative path refers to a schema
pub trait Matcher {
    fn check(&self, path: &str) -> Option<SchemaInfo>;
}

impl<F> Matcher for F
where
    F: Fn(&str) -> Option<SchemaInfo>,
{
    fn check(&self, path: &str) -> Option<SchemaInfo> {
        self(path)
    }
}

/// Matcher driven by a regular expression with a `name` group and an
/// optional `version` group
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Compile `pattern`, which must define a capture group called `name`
    pub fn new(pattern: &str) -> SchemaResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidMatcher {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_regex(regex)
    }

    /// Wrap an already compiled expression
    pub fn from_regex(regex: Regex) -> SchemaResult<Self> {
        if !regex.capture_names().flatten().any(|group| group == "name") {
            return Err(SchemaError::InvalidMatcher {
                pattern: regex.as_str().to_string(),
                reason: "pattern must have a capture group called 'name'".to_string(),
            });
        }
        Ok(Self { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl Matcher for RegexMatcher {
    fn check(&self, path: &str) -> Option<SchemaInfo> {
        let captures = self.regex.captures(path)?;
        let name = captures.name("name")?.as_str();
        let version = captures.name("version").map(|m| m.as_str());
        Some(SchemaInfo::new(name, version))
    }
}

const VERSION_NAME_PATTERN: &str = r"(?:(?P<version>[^/\\]+?)(?:/|\\))?(?P<name>[^/\\]+?)\.json$";
const NAME_VERSION_PATTERN: &str = r"(?P<name>[^/\\]+?)(?:(?:/|\\)(?P<version>[^/\\]+?))?\.json$";

fn builtin(cell: &'static OnceLock<Regex>, pattern: &str) -> RegexMatcher {
    let regex = cell.get_or_init(|| Regex::new(pattern).expect("built-in matcher pattern compiles"));
    RegexMatcher {
        regex: regex.clone(),
    }
}

/// Matches `<version>/<name>.json`, or `<name>.json` for unversioned schemas
pub fn version_name_matcher() -> RegexMatcher {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    builtin(&REGEX, VERSION_NAME_PATTERN)
}

/// Matches `<name>/<version>.json`, or `<name>.json` for unversioned schemas
pub fn name_version_matcher() -> RegexMatcher {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    builtin(&REGEX, NAME_VERSION_PATTERN)
}
