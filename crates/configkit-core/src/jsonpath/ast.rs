//! Abstract syntax tree definitions for JSONPath expressions
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use std::fmt;

/// A parsed JSONPath expression represented as an AST
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// The root selector (typically Root)
    pub root: Selector,
    /// Chain of subsequent selectors
    pub selectors: Vec<Selector>,
}

/// Individual selector in a JSONPath expression
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Root selector ($)
    Root,
    /// Child property selector (.property or ['property'])
    Child(ChildSelector),
    /// Array index selector ([index])
    Index(IndexSelector),
    /// Array slice selector ([start:end:step])
    Slice(SliceSelector),
    /// Wildcard selector (* or [*])
    Wildcard,
    /// Recursive descent selector (..)
    RecursiveDescent,
    /// Union selector ([expr1, expr2, ...])
    Union(UnionSelector),
}

/// Child property selector variants
#[derive(Debug, Clone, PartialEq)]
pub enum ChildSelector {
    /// Property name (e.g., .property)
    Property(String),
    /// Quoted property name (e.g., ['property'])
    QuotedProperty(String),
}

/// Array index selector variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexSelector {
    /// Positive index from start
    Positive(usize),
    /// Negative index from end
    Negative(usize),
}

/// Array slice selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceSelector {
    /// Start index (inclusive), None means start from beginning
    pub start: Option<i64>,
    /// End index (exclusive), None means go to end
    pub end: Option<i64>,
    /// Step size, default is 1
    pub step: i64,
}

/// Union selector containing multiple expressions
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSelector {
    /// List of selectors to union
    pub selectors: Vec<Selector>,
}

impl ChildSelector {
    pub fn name(&self) -> &str {
        match self {
            ChildSelector::Property(name) | ChildSelector::QuotedProperty(name) => name,
        }
    }
}

impl Selector {
    /// Whether this selector can turn one input node into several outputs
    pub fn is_multi_select(&self) -> bool {
        matches!(
            self,
            Selector::Slice(_) | Selector::Wildcard | Selector::RecursiveDescent | Selector::Union(_)
        )
    }
}

impl Expression {
    /// Create a new expression with root and selectors
    pub fn new(root: Selector, selectors: Vec<Selector>) -> Self {
        Self { root, selectors }
    }

    /// Property name of a simple property access
    pub fn simple_property_name(&self) -> Option<&str> {
        match self.selectors.as_slice() {
            [Selector::Child(child)] => Some(child.name()),
            _ => None,
        }
    }

    /// Whether evaluation may select a collection of nodes rather than one
    ///
    /// True as soon as any step is a slice, wildcard, recursive descent or
    /// union, even if a particular document happens to yield one match.
    pub fn is_multi_select(&self) -> bool {
        self.selectors.iter().any(Selector::is_multi_select)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        let mut previous = &self.root;
        for selector in &self.selectors {
            match (previous, selector) {
                // `..` already supplies the separator
                (Selector::RecursiveDescent, Selector::Child(ChildSelector::Property(name))) => {
                    write!(f, "{}", name)?
                }
                _ => write!(f, "{}", selector)?,
            }
            previous = selector;
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Root => write!(f, "$"),
            Selector::Child(child) => write!(f, "{}", child),
            Selector::Index(index) => write!(f, "[{}]", index),
            Selector::Slice(slice) => write!(f, "{}", slice),
            Selector::Wildcard => write!(f, "[*]"),
            Selector::RecursiveDescent => write!(f, ".."),
            Selector::Union(union) => write!(f, "{}", union),
        }
    }
}

impl fmt::Display for ChildSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildSelector::Property(name) => write!(f, ".{}", name),
            ChildSelector::QuotedProperty(name) => write!(f, "['{}']", name.replace('\'', "\\'")),
        }
    }
}

impl fmt::Display for IndexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexSelector::Positive(index) => write!(f, "{}", index),
            IndexSelector::Negative(index) => write!(f, "-{}", index),
        }
    }
}

impl fmt::Display for SliceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        write_slice(f, self)?;
        write!(f, "]")
    }
}

fn write_slice(f: &mut fmt::Formatter<'_>, slice: &SliceSelector) -> fmt::Result {
    if let Some(start) = slice.start {
        write!(f, "{}", start)?;
    }
    write!(f, ":")?;
    if let Some(end) = slice.end {
        write!(f, "{}", end)?;
    }
    if slice.step != 1 {
        write!(f, ":{}", slice.step)?;
    }
    Ok(())
}

impl fmt::Display for UnionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match selector {
                Selector::Child(child) => write!(f, "'{}'", child.name().replace('\'', "\\'"))?,
                Selector::Index(index) => write!(f, "{}", index)?,
                Selector::Slice(slice) => write_slice(f, slice)?,
                Selector::Wildcard => write!(f, "*")?,
                other => write!(f, "{}", other)?,
            }
        }
        write!(f, "]")
    }
}
