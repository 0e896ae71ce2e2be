//! Configkit Schemas - versioned JSON Schema discovery and validation
//!
//! This crate finds JSON Schema (draft 7) definitions in a directory tree,
//! groups them by name and version, and validates config documents against
//! them:
//! - **Matchers** map a schema file path to a name and optional version
//! - **SchemaDirectory** scans a tree once per cache scope
//! - **VersionSet** filters and orders the versions of one schema
//! - **SchemaDocument** loads JSON, YAML or TOML config files and validates
//!   them, resolving `$ref`s across every schema in the directory by `$id`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use configkit_schemas::{SchemaDirectory, VersionSpecifier};
//!
//! let directory = SchemaDirectory::new("schemas");
//! let _scope = directory.use_cache();
//!
//! let spec = VersionSpecifier::parse(">=1.0,<2").unwrap();
//! if let Some(versions) = directory.get("config").unwrap() {
//!     let schema = versions.newest(Some(&spec), true).unwrap();
//!     let config = schema.load("config/config.yaml").unwrap();
//!     println!("{}", config);
//! }
//! ```
//!
//! ## Features
//!
//! `yaml` and `toml` (both default) compile in the YAML and TOML parsers.
//! Without them, loading such a file fails with
//! [`SchemaError::MissingDependency`]. The load path for that case is
//! exercised by `cargo test -p configkit-schemas --no-default-features`.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

pub mod directory;
pub mod error;
pub mod format;
pub mod matchers;
pub mod schema;
pub mod validation;
pub mod versioning;
pub mod versions;

// Re-export commonly used types for convenience
pub use directory::{CacheScope, ScanCache, SchemaDirectory, Schemas};
pub use error::{SchemaError, SchemaResult};
pub use format::{Format, TextEncoding};
pub use matchers::{name_version_matcher, version_name_matcher, Matcher, RegexMatcher, SchemaInfo};
pub use schema::{CustomParser, LoadOptions, ParserError, SchemaDocument};
pub use validation::{ValidationFailure, Violation};
pub use versioning::{Version, VersionSpecifier};
pub use versions::{unversioned_lowest_key, version_sort_key, SortKey, VersionKey, VersionSet};
