//! Selector implementations for JSONPath traversal
//!
//! Each selector maps the current node list to the next one. Values are never
//! copied; every stage works on references into the evaluated document.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use super::ast::{self, ChildSelector, Selector};
use super::error::*;
use crate::Result;
use serde_json::Value;

/// Node list flowing between selectors
pub struct SelectionIterator<'a> {
    values: Vec<&'a Value>,
    index: usize,
}

impl<'a> SelectionIterator<'a> {
    /// Create a new selection iterator
    pub fn new(values: Vec<&'a Value>) -> Self {
        Self { values, index: 0 }
    }

    /// Create a single-value iterator
    pub fn single(value: &'a Value) -> Self {
        Self::new(vec![value])
    }

    /// Collect all remaining values
    pub fn collect(self) -> Vec<&'a Value> {
        let mut values = self.values;
        values.drain(..self.index);
        values
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.values.len() - self.index
    }
}

impl<'a> Iterator for SelectionIterator<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.values.get(self.index).copied()?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SelectionIterator<'_> {}

/// Trait for selector execution
pub trait SelectorExecutor {
    /// Execute this selector on a set of input values
    fn execute<'a>(&self, inputs: SelectionIterator<'a>) -> Result<SelectionIterator<'a>>;
}

/// Root selector implementation
pub struct RootSelector;

impl SelectorExecutor for RootSelector {
    fn execute<'a>(&self, inputs: SelectionIterator<'a>) -> Result<SelectionIterator<'a>> {
        Ok(inputs)
    }
}

/// Property selector implementation
pub struct PropertySelector {
    pub key: String,
}

impl PropertySelector {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SelectorExecutor for PropertySelector {
    fn execute<'a>(&self, inputs: SelectionIterator<'a>) -> Result<SelectionIterator<'a>> {
        let results = inputs
            .filter_map(|value| value.as_object().and_then(|obj| obj.get(&self.key)))
            .collect();
        Ok(SelectionIterator::new(results))
    }
}

/// Array index selector implementation
pub struct IndexSelector {
    pub index: ast::IndexSelector,
}

impl IndexSelector {
    pub fn positive(index: usize) -> Self {
        Self {
            index: ast::IndexSelector::Positive(index),
        }
    }

    pub fn negative(index: usize) -> Self {
        Self {
            index: ast::IndexSelector::Negative(index),
        }
    }

    fn resolve(&self, length: usize) -> Option<usize> {
        match self.index {
            ast::IndexSelector::Positive(idx) if idx < length => Some(idx),
            ast::IndexSelector::Negative(idx) if idx > 0 && idx <= length => Some(length - idx),
            _ => None,
        }
    }
}

impl SelectorExecutor for IndexSelector {
    fn execute<'a>(&self, inputs: SelectionIterator<'a>) -> Result<SelectionIterator<'a>> {
        let results = inputs
            .filter_map(|value| {
                let array = value.as_array()?;
                self.resolve(array.len()).map(|idx| &array[idx])
            })
            .collect();
        Ok(SelectionIterator::new(results))
    }
}

/// Array slice selector implementation with Python slice semantics
pub struct SliceSelector {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: i64,
}

impl SliceSelector {
    pub fn new(start: Option<i64>, end: Option<i64>, step: i64) -> Self {
        Self { start, end, step }
    }

    /// Indices selected from an array of `length` elements, in visit order
    fn indices(&self, length: usize) -> Vec<usize> {
        let len = length as i64;
        let clamp = |bound: i64, low: i64, high: i64| {
            let bound = if bound < 0 { bound + len } else { bound };
            bound.clamp(low, high)
        };

        if self.step > 0 {
            let start = self.start.map_or(0, |s| clamp(s, 0, len));
            let end = self.end.map_or(len, |e| clamp(e, 0, len));
            (start..end.max(start))
                .step_by(self.step as usize)
                .map(|i| i as usize)
                .collect()
        } else {
            // -1 stands for "before the first element"
            let start = self.start.map_or(len - 1, |s| clamp(s, -1, len - 1));
            let end = self.end.map_or(-1, |e| clamp(e, -1, len - 1));
            let step = self.step.unsigned_abs() as usize;
            let mut indices = Vec::new();
            let mut i = start;
            while i > end {
                indices.push(i as usize);
                i -= step as i64;
            }
            indices
        }
    }
}

impl SelectorExecutor for SliceSelector {
    fn execute<'a>(&self, inputs: SelectionIterator<'a>) -> Result<SelectionIterator<'a>> {
        if self.step == 0 {
            return Err(JSONPathError::execution(
                "Slice step cannot be zero",
                format!("[{:?}:{:?}:0]", self.start, self.end),
            )
            .into());
        }

        let mut results = Vec::new();
        for value in inputs {
            if let Some(array) = value.as_array() {
                results.extend(self.indices(array.len()).into_iter().map(|i| &array[i]));
            }
        }

        Ok(SelectionIterator::new(results))
    }
}

/// Wildcard selector implementation
pub struct WildcardSelector;

impl SelectorExecutor for WildcardSelector {
    fn execute<'a>(&self, inputs: SelectionIterator<'a>) -> Result<SelectionIterator<'a>> {
        let mut results = Vec::new();

        for value in inputs {
            match value {
                Value::Object(obj) => results.extend(obj.values()),
                Value::Array(array) => results.extend(array.iter()),
                // Wildcards don't match primitive values
                _ => {}
            }
        }

        Ok(SelectionIterator::new(results))
    }
}

/// Recursive descent selector implementation
///
/// Yields each input node followed by all of its descendants in document
/// order, so `$..name` also matches `name` directly under the root.
pub struct RecursiveDescentSelector;

impl RecursiveDescentSelector {
    fn collect_recursive<'a>(value: &'a Value, results: &mut Vec<&'a Value>) {
        results.push(value);
        match value {
            Value::Object(obj) => {
                for child in obj.values() {
                    Self::collect_recursive(child, results);
                }
            }
            Value::Array(array) => {
                for child in array {
                    Self::collect_recursive(child, results);
                }
            }
            _ => {}
        }
    }
}

impl SelectorExecutor for RecursiveDescentSelector {
    fn execute<'a>(&self, inputs: SelectionIterator<'a>) -> Result<SelectionIterator<'a>> {
        let mut results = Vec::new();
        for value in inputs {
            Self::collect_recursive(value, &mut results);
        }
        Ok(SelectionIterator::new(results))
    }
}

/// Union selector implementation
pub struct UnionSelector {
    pub selectors: Vec<Box<dyn SelectorExecutor>>,
}

impl UnionSelector {
    pub fn new(selectors: Vec<Box<dyn SelectorExecutor>>) -> Self {
        Self { selectors }
    }
}

impl SelectorExecutor for UnionSelector {
    fn execute<'a>(&self, inputs: SelectionIterator<'a>) -> Result<SelectionIterator<'a>> {
        let input_values: Vec<&'a Value> = inputs.collect();
        let mut results: Vec<&'a Value> = Vec::new();

        for selector in &self.selectors {
            let selected = selector.execute(SelectionIterator::new(input_values.clone()))?;
            for value in selected {
                // Same node reached twice, not merely an equal value
                if !results.iter().any(|seen| std::ptr::eq(*seen, value)) {
                    results.push(value);
                }
            }
        }

        Ok(SelectionIterator::new(results))
    }
}

/// Create a selector executor from a parsed selector
pub fn create_selector_executor(selector: &Selector) -> Box<dyn SelectorExecutor> {
    match selector {
        Selector::Root => Box::new(RootSelector),
        Selector::Child(ChildSelector::Property(key) | ChildSelector::QuotedProperty(key)) => {
            Box::new(PropertySelector::new(key.clone()))
        }
        Selector::Index(index) => Box::new(IndexSelector { index: *index }),
        Selector::Slice(slice) => Box::new(SliceSelector::new(slice.start, slice.end, slice.step)),
        Selector::Wildcard => Box::new(WildcardSelector),
        Selector::RecursiveDescent => Box::new(RecursiveDescentSelector),
        Selector::Union(union) => Box::new(UnionSelector::new(
            union.selectors.iter().map(create_selector_executor).collect(),
        )),
    }
}
