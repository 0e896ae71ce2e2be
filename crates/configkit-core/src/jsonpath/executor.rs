//! JSONPath expression executor
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use super::ast::*;
use super::selector::{create_selector_executor, SelectionIterator};
use crate::Result;
use serde_json::Value;

/// Runs parsed expressions against a document
#[derive(Debug, Clone, Default)]
pub struct Executor {
    context: ExecutionContext,
}

/// Execution context for controlling execution behavior
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Maximum number of results to return (0 = unlimited)
    pub max_results: usize,
}

impl Executor {
    /// Create a new executor with default context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new executor with custom context
    pub fn with_context(context: ExecutionContext) -> Self {
        Self { context }
    }

    /// Execute an expression against data, returning matches in document order
    pub fn execute<'a>(&self, expression: &Expression, data: &'a Value) -> Result<Vec<&'a Value>> {
        if let Some(name) = expression.simple_property_name() {
            return Ok(data.get(name).into_iter().collect());
        }

        let mut current = SelectionIterator::single(data);
        for selector in &expression.selectors {
            current = create_selector_executor(selector).execute(current)?;
            if current.is_empty() {
                break;
            }
        }

        let mut results = current.collect();
        if self.context.max_results > 0 {
            results.truncate(self.context.max_results);
        }
        Ok(results)
    }

    /// Execute and return only the first result
    pub fn execute_first<'a>(&self, expression: &Expression, data: &'a Value) -> Result<Option<&'a Value>> {
        let executor = Self::with_context(ExecutionContext { max_results: 1 });
        Ok(executor.execute(expression, data)?.into_iter().next())
    }

    /// Execute and check if any results exist
    pub fn exists(&self, expression: &Expression, data: &Value) -> Result<bool> {
        Ok(self.execute_first(expression, data)?.is_some())
    }
}
