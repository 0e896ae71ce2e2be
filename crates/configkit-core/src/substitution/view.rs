//! Read-only lazy views over mappings, sequences and sets
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use super::{resolve_member, Resolved};
use crate::Result;
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Mapping {}
    impl Sealed for super::Sequence {}
    impl Sealed for super::Set {}
}

/// Container kind presented by a [`LazyView`]
pub trait Shape: sealed::Sealed {
    /// How the view holds on to its unresolved members
    type Members<'a>: Clone;

    const NAME: &'static str;

    fn raw_len(members: &Self::Members<'_>) -> usize;
}

/// Ordered key/value container
#[derive(Debug, Clone, Copy)]
pub struct Mapping;

/// Ordered list
#[derive(Debug, Clone, Copy)]
pub struct Sequence;

/// Unordered collection of distinct resolved members
#[derive(Debug, Clone, Copy)]
pub struct Set;

impl Shape for Mapping {
    type Members<'a> = &'a Map<String, Value>;
    const NAME: &'static str = "mapping";

    fn raw_len(members: &Self::Members<'_>) -> usize {
        members.len()
    }
}

impl Shape for Sequence {
    type Members<'a> = Rc<[&'a Value]>;
    const NAME: &'static str = "sequence";

    fn raw_len(members: &Self::Members<'_>) -> usize {
        members.len()
    }
}

impl Shape for Set {
    type Members<'a> = Rc<[&'a Value]>;
    const NAME: &'static str = "set";

    fn raw_len(members: &Self::Members<'_>) -> usize {
        members.len()
    }
}

/// Wraps part of a config tree and substitutes placeholders on every read
///
/// Views borrow the tree; no member is copied until [`to_value`] is called.
/// A view reached through a placeholder remembers the chain of paths that
/// produced it, so reads through it still detect cycles.
///
/// [`to_value`]: LazyView::to_value
pub struct LazyView<'a, S: Shape> {
    members: S::Members<'a>,
    root: &'a Value,
    origin: Rc<[String]>,
    shape: PhantomData<S>,
}

pub type MappingView<'a> = LazyView<'a, Mapping>;
pub type SequenceView<'a> = LazyView<'a, Sequence>;
pub type SetView<'a> = LazyView<'a, Set>;

impl<'a, S: Shape> LazyView<'a, S> {
    fn new(members: S::Members<'a>, root: &'a Value, origin: Rc<[String]>) -> Self {
        Self {
            members,
            root,
            origin,
            shape: PhantomData,
        }
    }

    /// Tree that placeholders are resolved against
    pub fn root(&self) -> &'a Value {
        self.root
    }

    pub fn shape(&self) -> &'static str {
        S::NAME
    }

    fn read(&self, member: &'a Value) -> Result<Resolved<'a>> {
        resolve_member(member, self.root, &self.origin)
    }
}

impl<'a> LazyView<'a, Mapping> {
    pub(crate) fn mapping(members: &'a Map<String, Value>, root: &'a Value, origin: Rc<[String]>) -> Self {
        Self::new(members, root, origin)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    /// Keys in source order
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        let members: &'a Map<String, Value> = self.members;
        members.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Result<Option<Resolved<'a>>> {
        let members: &'a Map<String, Value> = self.members;
        members.get(key).map(|member| self.read(member)).transpose()
    }

    /// Entries in source order, each resolved as it is reached
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Result<Resolved<'a>>)> + 'a {
        let members: &'a Map<String, Value> = self.members;
        let root = self.root;
        let origin = Rc::clone(&self.origin);
        members
            .iter()
            .map(move |(key, member)| (key.as_str(), resolve_member(member, root, &origin)))
    }

    /// The wrapped mapping without substitution
    pub fn raw(&self) -> &'a Map<String, Value> {
        self.members
    }

    pub fn to_value(&self) -> Result<Value> {
        let mut map = Map::with_capacity(self.len());
        for (key, member) in self.iter() {
            map.insert(key.to_string(), member?.to_value()?);
        }
        Ok(Value::Object(map))
    }
}

impl<'a> LazyView<'a, Sequence> {
    pub(crate) fn sequence(members: Vec<&'a Value>, root: &'a Value, origin: Rc<[String]>) -> Self {
        Self::new(Rc::from(members), root, origin)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<Option<Resolved<'a>>> {
        self.members
            .get(index)
            .copied()
            .map(|member| self.read(member))
            .transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Resolved<'a>>> + 'a {
        let members = Rc::clone(&self.members);
        let root = self.root;
        let origin = Rc::clone(&self.origin);
        (0..members.len()).map(move |index| resolve_member(members[index], root, &origin))
    }

    /// Reinterpret the same members as a set
    pub fn to_set(&self) -> SetView<'a> {
        LazyView::new(Rc::clone(&self.members), self.root, Rc::clone(&self.origin))
    }

    pub fn to_value(&self) -> Result<Value> {
        self.iter()
            .map(|member| member?.to_value())
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<'a> LazyView<'a, Set> {
    /// Distinct members after substitution, in no particular order
    ///
    /// Members are compared by their fully substituted values, so
    /// `"${{a}}"` and a literal equal to `a` count once.
    pub fn members(&self) -> Result<Vec<Resolved<'a>>> {
        let mut seen: Vec<Value> = Vec::new();
        let mut distinct = Vec::new();
        for member in self.members.iter().copied() {
            let resolved = self.read(member)?;
            let value = resolved.to_value()?;
            if !seen.contains(&value) {
                seen.push(value);
                distinct.push(resolved);
            }
        }
        Ok(distinct)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.members()?.len())
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, value: &Value) -> Result<bool> {
        for member in self.members.iter().copied() {
            if &self.read(member)?.to_value()? == value {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn to_value(&self) -> Result<Value> {
        self.members()?
            .iter()
            .map(Resolved::to_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<S: Shape> Clone for LazyView<'_, S> {
    fn clone(&self) -> Self {
        Self {
            members: self.members.clone(),
            root: self.root,
            origin: Rc::clone(&self.origin),
            shape: PhantomData,
        }
    }
}

impl<S: Shape> fmt::Debug for LazyView<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyView")
            .field("shape", &S::NAME)
            .field("len", &S::raw_len(&self.members))
            .field("origin", &self.origin)
            .finish()
    }
}
