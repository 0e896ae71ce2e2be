//! JSONPath engine used to locate placeholder targets
//!
//! Supports the subset needed for config references: `$`, `.name`,
//! `['name']`, `[n]`, `[-n]`, `[start:end:step]`, `*`, `[*]`, `..` and
//! `[a,b]` unions. Identifiers may contain `-` after the first character.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

pub mod ast;
pub mod error;
pub mod executor;
pub mod parser;
pub mod selector;

pub use ast::{Expression, Selector};
pub use error::JSONPathError;
pub use executor::{ExecutionContext, Executor};
pub use parser::Parser;

use crate::Result;
use serde_json::Value;

/// A parsed JSONPath expression
#[derive(Debug, Clone, PartialEq)]
pub struct JSONPath {
    expression: Expression,
}

impl JSONPath {
    pub fn parse(path: &str) -> Result<Self> {
        let expression = Parser::new(path)?.parse()?;
        Ok(Self { expression })
    }

    /// Execute the JSONPath against the given data
    pub fn execute<'a>(&self, data: &'a Value) -> Result<Vec<&'a Value>> {
        Executor::new().execute(&self.expression, data)
    }

    /// Execute and return the first match, if any
    pub fn execute_single<'a>(&self, data: &'a Value) -> Result<Option<&'a Value>> {
        Executor::new().execute_first(&self.expression, data)
    }

    /// Check if the path exists in the data
    pub fn exists(&self, data: &Value) -> Result<bool> {
        Executor::new().exists(&self.expression, data)
    }

    /// See [`Expression::is_multi_select`]
    pub fn is_multi_select(&self) -> bool {
        self.expression.is_multi_select()
    }

    /// Get the parsed expression for inspection
    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

impl std::fmt::Display for JSONPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl std::str::FromStr for JSONPath {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convenient functions for direct JSONPath operations
pub fn select<'a>(path: &str, data: &'a Value) -> Result<Vec<&'a Value>> {
    JSONPath::parse(path)?.execute(data)
}

pub fn select_single<'a>(path: &str, data: &'a Value) -> Result<Option<&'a Value>> {
    JSONPath::parse(path)?.execute_single(data)
}

pub fn exists(path: &str, data: &Value) -> Result<bool> {
    JSONPath::parse(path)?.exists(data)
}
