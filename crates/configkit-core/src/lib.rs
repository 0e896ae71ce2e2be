//! Configkit Core - config groups with lazy placeholder substitution
//!
//! This crate builds on `configkit-schemas` to resolve a whole directory of
//! config files at once:
//! - **ConfigGroup** loads `<name>.<ext>` for every schema name, validating
//!   each file through the newest compatible schema version
//! - **Substitution** resolves `${{path}}` placeholders lazily against the
//!   whole group through read-only views
//! - **JSONPath** evaluates the path subset that placeholders use
//!
//! ## Example
//!
//! ```no_run
//! use configkit_core::{ConfigGroup, Result};
//!
//! fn example() -> Result<()> {
//!     let group = ConfigGroup::new("schemas", "config")?;
//!     if let Some(server) = group.get("server")? {
//!         println!("{}", server.to_value()?);
//!     }
//!     let host = group.resolve_path("server.host")?;
//!     println!("{:?}", host.as_str());
//!     Ok(())
//! }
//! ```
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

pub mod config_group;
pub mod error;
pub mod jsonpath;
pub mod substitution;

// Re-export main types for convenience
pub use config_group::{ConfigGroup, ConfigGroupBuilder, ConfigResolver, RefreshOptions};
pub use error::{Error, Result};
pub use jsonpath::{JSONPath, JSONPathError};
pub use substitution::{
    resolve_reference, resolve_value, LazyView, MappingView, Resolved, SequenceView, SetView, Shape,
};

pub use configkit_schemas as schemas;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
