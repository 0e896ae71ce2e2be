//! Lazy `${{path}}` placeholder substitution over a config tree
//!
//! String values may embed references of the form `${{<path>}}`, where
//! `<path>` is evaluated as `$.<path>` against the whole tree. Nothing is
//! rewritten up front: reads through a [`LazyView`] resolve placeholders on
//! demand and never write back into the source tree.
//!
//! Resolution rules for one string value:
//! - Placeholders are found left to right and each path is evaluated.
//! - A path that selects nothing fails with [`Error::UnresolvedPath`].
//! - A multi-element selection (slice, wildcard, recursive descent, union)
//!   must be the whole value, otherwise [`Error::SliceNotWholeValue`]; the
//!   value then becomes a sequence view over the selected nodes.
//! - Scalars are spliced into the text. A lone placeholder that resolves to
//!   a number, bool or null keeps that type.
//! - A mapping or sequence result replaces the entire value with a view.
//! - The referenced value is itself resolved first. Each read tracks the
//!   chain of paths being resolved and a repeat fails with
//!   [`Error::CyclicSubstitution`].
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

mod view;

pub use view::{LazyView, Mapping, MappingView, Sequence, SequenceView, Set, SetView, Shape};

use crate::jsonpath::JSONPath;
use crate::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::rc::Rc;
use std::sync::OnceLock;
use tracing::trace;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

/// Pattern matching one `${{path}}` placeholder, capturing the path
pub fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{\{(.+?)\}\}").expect("placeholder pattern is valid"))
}

/// Whether `text` contains at least one placeholder
pub fn has_placeholder(text: &str) -> bool {
    placeholder_regex().is_match(text)
}

/// Result of reading a value through the substitution engine
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    /// A string, number, bool or null; borrowed when nothing was substituted
    Scalar(Cow<'a, Value>),
    Mapping(MappingView<'a>),
    Sequence(SequenceView<'a>),
}

impl<'a> Resolved<'a> {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Resolved::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    pub fn as_mapping(&self) -> Option<&MappingView<'a>> {
        match self {
            Resolved::Mapping(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&SequenceView<'a>> {
        match self {
            Resolved::Sequence(view) => Some(view),
            _ => None,
        }
    }

    pub fn into_mapping(self) -> Option<MappingView<'a>> {
        match self {
            Resolved::Mapping(view) => Some(view),
            _ => None,
        }
    }

    pub fn into_sequence(self) -> Option<SequenceView<'a>> {
        match self {
            Resolved::Sequence(view) => Some(view),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Resolved::Scalar(_))
    }

    /// Fully substituted owned copy of this value
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Resolved::Scalar(value) => Ok(value.as_ref().clone()),
            Resolved::Mapping(view) => view.to_value(),
            Resolved::Sequence(view) => view.to_value(),
        }
    }
}

/// Read `value` through the substitution engine, resolving against `root`
pub fn resolve_value<'a>(value: &'a Value, root: &'a Value) -> Result<Resolved<'a>> {
    substitute(value, root, &mut Vec::new())
}

/// Resolve a bare path as if it were the lone placeholder `${{path}}`
///
/// A leading `$` is accepted, so both `server.host` and `$.server.host` work.
pub fn resolve_reference<'a>(path: &str, root: &'a Value) -> Result<Resolved<'a>> {
    let path = path.trim();
    let path = path
        .strip_prefix("$.")
        .or_else(|| path.strip_prefix('$'))
        .unwrap_or(path);
    if path.is_empty() {
        return resolve_value(root, root);
    }
    match reference(path, root, &mut Vec::new(), true, path)? {
        Piece::Text(text) => Ok(Resolved::Scalar(Cow::Owned(Value::String(text)))),
        Piece::Whole(resolved) => Ok(resolved),
    }
}

/// Read one member with a fresh chain seeded from the view's origin
pub(crate) fn resolve_member<'a>(value: &'a Value, root: &'a Value, origin: &[String]) -> Result<Resolved<'a>> {
    let mut chain = origin.to_vec();
    substitute(value, root, &mut chain)
}

fn substitute<'a>(value: &'a Value, root: &'a Value, chain: &mut Vec<String>) -> Result<Resolved<'a>> {
    match value {
        Value::String(text) => substitute_str(value, text, root, chain),
        Value::Object(map) => Ok(Resolved::Mapping(LazyView::mapping(map, root, origin(chain)))),
        Value::Array(items) => Ok(Resolved::Sequence(LazyView::sequence(
            items.iter().collect(),
            root,
            origin(chain),
        ))),
        _ => Ok(Resolved::Scalar(Cow::Borrowed(value))),
    }
}

fn origin(chain: &[String]) -> Rc<[String]> {
    Rc::from(chain)
}

/// Outcome of resolving one placeholder
enum Piece<'a> {
    /// Text to splice in place of the placeholder
    Text(String),
    /// Replaces the entire string value
    Whole(Resolved<'a>),
}

fn substitute_str<'a>(
    value: &'a Value,
    text: &'a str,
    root: &'a Value,
    chain: &mut Vec<String>,
) -> Result<Resolved<'a>> {
    let regex = placeholder_regex();
    if !regex.is_match(text) {
        return Ok(Resolved::Scalar(Cow::Borrowed(value)));
    }

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for captures in regex.captures_iter(text) {
        let (Some(whole), Some(path)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let is_whole_value = whole.start() == 0 && whole.end() == text.len();

        match reference(path.as_str().trim(), root, chain, is_whole_value, text)? {
            Piece::Text(replacement) => {
                output.push_str(&text[cursor..whole.start()]);
                output.push_str(&replacement);
                cursor = whole.end();
            }
            Piece::Whole(resolved) => return Ok(resolved),
        }
    }

    output.push_str(&text[cursor..]);
    Ok(Resolved::Scalar(Cow::Owned(Value::String(output))))
}

fn reference<'a>(
    path: &str,
    root: &'a Value,
    chain: &mut Vec<String>,
    is_whole_value: bool,
    text: &str,
) -> Result<Piece<'a>> {
    if chain.iter().any(|seen| seen == path) {
        return Err(Error::cyclic(path, chain));
    }

    let expression = JSONPath::parse(&format!("$.{}", path))?;
    trace!(path, whole = is_whole_value, "Resolving placeholder");

    if expression.is_multi_select() {
        if !is_whole_value {
            return Err(Error::SliceNotWholeValue {
                path: path.to_string(),
                value: text.to_string(),
            });
        }
        let selected = expression.execute(root)?;
        chain.push(path.to_string());
        let view = LazyView::sequence(selected, root, origin(chain));
        chain.pop();
        return Ok(Piece::Whole(Resolved::Sequence(view)));
    }

    let target = expression
        .execute_single(root)?
        .ok_or_else(|| Error::UnresolvedPath {
            path: path.to_string(),
        })?;

    chain.push(path.to_string());
    let resolved = substitute(target, root, chain);
    chain.pop();

    Ok(match resolved? {
        Resolved::Scalar(scalar) if !is_whole_value => Piece::Text(render(&scalar)),
        other => Piece::Whole(other),
    })
}

/// Text form of a scalar spliced into a larger string
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
