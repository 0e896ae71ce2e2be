//! Schema documents and config loading
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::directory::{DirectoryInner, SchemaDirectory};
use crate::error::{SchemaError, SchemaResult};
use crate::format::{Format, TextEncoding};
use crate::matchers::SchemaInfo;
use crate::validation::{ValidationFailure, Violation};
use serde_json::Value;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::rc::Weak;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Error type returned by caller-supplied parsers
pub type ParserError = Box<dyn std::error::Error + Send + Sync>;

/// Caller-supplied parser that replaces extension-based format detection
pub type CustomParser<'a> = &'a dyn Fn(&str) -> Result<Value, ParserError>;

/// Options for [`SchemaDocument::load_with`]
#[derive(Clone, Copy, Default)]
pub struct LoadOptions<'a> {
    /// Parse with this function instead of picking a format by extension
    pub parser: Option<CustomParser<'a>>,
    /// Text encoding of the file
    pub encoding: TextEncoding,
}

impl<'a> LoadOptions<'a> {
    pub fn with_parser(mut self, parser: CustomParser<'a>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// One versioned schema definition discovered in a [`SchemaDirectory`]
///
/// Documents are identified by their declared `$id`: two documents with the
/// same id compare and hash equal even if their bodies differ. A document
/// without an id is only equal to itself and its clones.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    definition: Value,
    info: SchemaInfo,
    directory: Weak<DirectoryInner>,
    serial: u64,
}

static NEXT_SERIAL: AtomicU64 = AtomicU64::new(0);

impl SchemaDocument {
    pub(crate) fn new(definition: Value, info: SchemaInfo, directory: Weak<DirectoryInner>) -> Self {
        Self {
            definition,
            info,
            directory,
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// A document that belongs to no directory; `$ref`s only resolve
    /// against the definition itself
    pub fn detached(definition: Value, info: SchemaInfo) -> Self {
        Self::new(definition, info, Weak::new())
    }

    /// Check whether `definition` is a structurally valid draft 7 schema
    pub fn check(definition: &Value) -> bool {
        jsonschema::draft7::meta::is_valid(definition)
    }

    /// The declared `$id`
    pub fn id(&self) -> Option<&str> {
        self.definition.get("$id").and_then(Value::as_str)
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn version(&self) -> Option<&str> {
        self.info.version.as_deref()
    }

    pub fn info(&self) -> &SchemaInfo {
        &self.info
    }

    pub fn definition(&self) -> &Value {
        &self.definition
    }

    /// The directory this document was discovered in, if it is still alive
    pub fn directory(&self) -> Option<SchemaDirectory> {
        self.directory.upgrade().map(SchemaDirectory::from_inner)
    }

    /// Load and validate a config file, choosing the parser by extension
    pub fn load(&self, path: impl AsRef<Path>) -> SchemaResult<Value> {
        self.load_with(path, LoadOptions::default())
    }

    /// Load and validate a config file
    ///
    /// The parser is resolved before the file is read, so an unknown
    /// extension or a compiled-out format fails without touching the disk.
    pub fn load_with(&self, path: impl AsRef<Path>, options: LoadOptions<'_>) -> SchemaResult<Value> {
        let path = path.as_ref();

        let instance = match options.parser {
            Some(parser) => {
                let text = read_text(path, options.encoding)?;
                parser(&text).map_err(|e| SchemaError::CustomParseError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?
            }
            None => {
                let parse = Format::parser_for(path)?;
                let text = read_text(path, options.encoding)?;
                parse(&text, path)?
            }
        };

        let violations = self.violations(&instance)?;
        if !violations.is_empty() {
            debug!(
                path = %path.display(),
                schema = ?self.id(),
                count = violations.len(),
                "Config failed validation"
            );
            return Err(SchemaError::validation_error(
                path,
                ValidationFailure::new(self.id().map(str::to_string), violations),
            ));
        }

        debug!(path = %path.display(), schema = ?self.id(), "Loaded config");
        Ok(instance)
    }

    /// Validate an in-memory instance, returning every violation found
    pub fn violations(&self, instance: &Value) -> SchemaResult<Vec<Violation>> {
        let validator = self.compile()?;
        Ok(validator
            .iter_errors(instance)
            .map(|error| Violation {
                instance_path: error.instance_path.to_string(),
                schema_path: error.schema_path.to_string(),
                message: error.to_string(),
            })
            .collect())
    }

    /// Build a validator whose `$ref`s resolve against every schema in the
    /// owning directory, keyed by `$id`
    fn compile(&self) -> SchemaResult<jsonschema::Validator> {
        let mut options = jsonschema::draft7::options();

        if let Some(directory) = self.directory() {
            for schema in directory.schemas(None)? {
                match schema.id() {
                    Some(id) if Some(id) != self.id() => {
                        let resource = jsonschema::Draft::Draft7.create_resource(schema.definition.clone());
                        options = options.with_resource(id, resource);
                    }
                    _ => {}
                }
            }
        }

        options
            .build(&self.definition)
            .map_err(|e| SchemaError::InvalidSchema {
                id: self.id().unwrap_or("<anonymous>").to_string(),
                reason: e.to_string(),
            })
    }
}

fn read_text(path: &Path, encoding: TextEncoding) -> SchemaResult<String> {
    let bytes = std::fs::read(path).map_err(|e| SchemaError::io_error(path, e))?;
    encoding.decode(bytes, path)
}

impl PartialEq for SchemaDocument {
    fn eq(&self, other: &Self) -> bool {
        match (self.id(), other.id()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.serial == other.serial,
            _ => false,
        }
    }
}

impl Eq for SchemaDocument {}

impl Hash for SchemaDocument {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.id() {
            Some(id) => id.hash(state),
            None => self.serial.hash(state),
        }
    }
}
