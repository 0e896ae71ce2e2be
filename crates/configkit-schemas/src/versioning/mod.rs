//! Release versions and version specifiers
//!
//! Versions and specifiers follow the PEP 440 conventions that schema trees
//! are usually laid out with (`0.1/`, `1.0/`, `~=1.0`, `>=0.2,<2`).
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

pub mod specifier;
pub mod version;

pub use specifier::{Clause, Operator, VersionSpecifier};
pub use version::{PreRelease, Version, VersionError};
