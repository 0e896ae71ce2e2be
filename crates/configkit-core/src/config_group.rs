//! Resolution of a directory of config files against versioned schemas
//!
//! A [`ConfigGroup`] pairs a [`SchemaDirectory`] with a config directory
//! holding files named `<schema-name>.<ext>`. Every schema name gets an
//! entry: the file validated through the newest compatible schema version,
//! or an empty mapping when no file exists. Reads go through the
//! substitution engine, so `${{path}}` placeholders resolve against the
//! whole group.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::substitution::{self, LazyView, MappingView, Resolved};
use crate::{Error, Result};
use configkit_schemas::{LoadOptions, SchemaDirectory, TextEncoding, VersionSpecifier};
use serde_json::{Map, Value};
use std::collections::btree_map::{BTreeMap, Entry};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

/// Per-refresh overrides; `None` keeps the group's configured value
#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    pub config_path: Option<PathBuf>,
    pub version_spec: Option<VersionSpecifier>,
    pub default: Option<String>,
}

impl RefreshOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_version_spec(mut self, spec: VersionSpecifier) -> Self {
        self.version_spec = Some(spec);
        self
    }

    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }
}

/// Resolved configs for every schema name in a directory
#[derive(Debug)]
pub struct ConfigGroup {
    directory: SchemaDirectory,
    config_path: PathBuf,
    version_spec: VersionSpecifier,
    default: Option<String>,
    match_unversioned: bool,
    encoding: TextEncoding,
    configs: Value,
}

/// Alternate name matching the role the group plays for callers
pub type ConfigResolver = ConfigGroup;

impl ConfigGroup {
    /// Open `schema_path` with the `<version>/<name>.json` layout and resolve `config_path`
    pub fn new(schema_path: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(SchemaDirectory::new(schema_path), config_path).build()
    }

    pub fn builder(directory: SchemaDirectory, config_path: impl Into<PathBuf>) -> ConfigGroupBuilder {
        ConfigGroupBuilder {
            directory,
            config_path: config_path.into(),
            version_spec: VersionSpecifier::any(),
            default: None,
            match_unversioned: true,
            encoding: TextEncoding::default(),
        }
    }

    pub fn directory(&self) -> &SchemaDirectory {
        &self.directory
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn version_spec(&self) -> &VersionSpecifier {
        &self.version_spec
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Recompute every config from scratch
    ///
    /// Runs inside a single cache scope, so the schema tree is walked once.
    /// Overrides in `options` apply to this refresh only. On error the
    /// previously resolved configs are left in place.
    pub fn refresh(&mut self, options: RefreshOptions) -> Result<()> {
        let config_path = options.config_path.as_deref().unwrap_or(&self.config_path);
        let version_spec = options.version_spec.as_ref().unwrap_or(&self.version_spec);
        let default = options.default.as_deref().or(self.default.as_deref());

        let configs = self.resolve(config_path, version_spec, default)?;
        info!(
            config_path = %config_path.display(),
            version_spec = %version_spec,
            configs = configs.len(),
            "Resolved config group"
        );
        self.configs = Value::Object(configs);
        Ok(())
    }

    fn resolve(
        &self,
        config_path: &Path,
        version_spec: &VersionSpecifier,
        default: Option<&str>,
    ) -> Result<Map<String, Value>> {
        let _scope = self.directory.use_cache();
        let files = config_files(config_path)?;
        let options = LoadOptions::default().with_encoding(self.encoding);

        let mut configs = Map::new();
        for (name, versions) in self.directory.iter()? {
            let schema = versions.newest(Some(version_spec), self.match_unversioned);
            let value = match (schema, files.get(&name)) {
                (Some(schema), Some(path)) => {
                    debug!(name = %name, schema = ?schema.id(), path = %path.display(), "Loading config");
                    schema.load_with(path, options)?
                }
                (None, Some(path)) => {
                    return Err(Error::NoCompatibleSchema {
                        name,
                        specifier: version_spec.to_string(),
                        path: path.clone(),
                    });
                }
                (_, None) => {
                    debug!(name = %name, "No config file, using an empty mapping");
                    Value::Object(Map::new())
                }
            };
            configs.insert(name, value);
        }

        if let Some(name) = default {
            flatten_default(&mut configs, name)?;
        }
        Ok(configs)
    }

    /// Resolved configs before substitution
    pub fn configs(&self) -> &Value {
        &self.configs
    }

    /// Substituting view over the whole group
    pub fn view(&self) -> MappingView<'_> {
        LazyView::mapping(self.entries(), &self.configs, Rc::from(Vec::new()))
    }

    pub fn get(&self, name: &str) -> Result<Option<Resolved<'_>>> {
        self.view().get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries().keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries().contains_key(name)
    }

    /// Evaluate a JSONPath against the group, with substitution
    ///
    /// `server.host` and `$.server.host` are equivalent. Multi-element
    /// selections come back as a sequence view.
    pub fn resolve_path(&self, path: &str) -> Result<Resolved<'_>> {
        substitution::resolve_reference(path, &self.configs)
    }

    /// Fully substituted owned copy of every config
    pub fn to_value(&self) -> Result<Value> {
        self.view().to_value()
    }

    fn entries(&self) -> &Map<String, Value> {
        static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
        match &self.configs {
            Value::Object(map) => map,
            _ => EMPTY.get_or_init(Map::new),
        }
    }
}

/// Builder for [`ConfigGroup`]
pub struct ConfigGroupBuilder {
    directory: SchemaDirectory,
    config_path: PathBuf,
    version_spec: VersionSpecifier,
    default: Option<String>,
    match_unversioned: bool,
    encoding: TextEncoding,
}

impl ConfigGroupBuilder {
    pub fn version_spec(mut self, spec: VersionSpecifier) -> Self {
        self.version_spec = spec;
        self
    }

    /// Name whose top-level keys are copied into the group's top level
    pub fn default_name(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    /// Whether unversioned schemas may be picked (on by default)
    pub fn match_unversioned(mut self, match_unversioned: bool) -> Self {
        self.match_unversioned = match_unversioned;
        self
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Resolve the configs once and return the group
    pub fn build(self) -> Result<ConfigGroup> {
        let mut group = ConfigGroup {
            directory: self.directory,
            config_path: self.config_path,
            version_spec: self.version_spec,
            default: self.default,
            match_unversioned: self.match_unversioned,
            encoding: self.encoding,
            configs: Value::Object(Map::new()),
        };
        group.refresh(RefreshOptions::default())?;
        Ok(group)
    }
}

/// Config files keyed by stem; a missing or non-directory path has none
fn config_files(config_path: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    if !config_path.is_dir() {
        debug!(path = %config_path.display(), "Config path is not a directory");
        return Ok(files);
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(config_path).map_err(|e| Error::io_error(config_path, e))? {
        let path = entry.map_err(|e| Error::io_error(config_path, e))?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };
        match files.entry(stem) {
            Entry::Occupied(kept) => warn!(
                name = %kept.key(),
                kept = %kept.get().display(),
                ignored = %path.display(),
                "Several config files share a name"
            ),
            Entry::Vacant(slot) => {
                slot.insert(path);
            }
        }
    }
    Ok(files)
}

/// Copy each top-level pair of the default config into the group's top level
fn flatten_default(configs: &mut Map<String, Value>, name: &str) -> Result<()> {
    let Some(default) = configs.get(name).cloned() else {
        debug!(name, "Default config not present");
        return Ok(());
    };
    let Value::Object(pairs) = default else {
        return Err(Error::NotAMapping {
            name: name.to_string(),
        });
    };
    for (key, value) in pairs {
        configs.insert(key, value);
    }
    Ok(())
}
