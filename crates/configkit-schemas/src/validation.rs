//! Structured validation failures
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single schema violation with its location in the instance and schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON pointer into the validated instance
    pub instance_path: String,
    /// JSON pointer into the schema keyword that failed
    pub schema_path: String,
    /// Human-readable reason
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "at '{}': {}", location, self.message)
    }
}

/// Every violation found while validating one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// `$id` of the schema the instance was checked against
    pub schema_id: Option<String>,
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(schema_id: Option<String>, violations: Vec<Violation>) -> Self {
        Self {
            schema_id,
            violations,
        }
    }

    /// Check whether any violation is located at `instance_path`
    pub fn has_violation_at(&self, instance_path: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.instance_path == instance_path)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        if let Some(id) = &self.schema_id {
            write!(f, " against '{}'", id)?;
        }
        for violation in &self.violations {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}
