//! Ordered collections of schema documents sharing one name
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::schema::SchemaDocument;
use crate::versioning::{Version, VersionSpecifier};
use std::rc::Rc;

/// Extracts an ordering key from a schema document
pub trait SortKey {
    type Key: Ord;

    fn key(&self, schema: &SchemaDocument) -> Self::Key;
}

impl<F, K> SortKey for F
where
    F: Fn(&SchemaDocument) -> K,
    K: Ord,
{
    type Key = K;

    fn key(&self, schema: &SchemaDocument) -> K {
        self(schema)
    }
}

/// Ordering key over optional, possibly unparseable versions
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionKey {
    /// Unversioned schema under [`unversioned_lowest_key`]
    Floor,
    /// Version string that does not parse
    Unparseable,
    Release(Version),
    /// Unversioned schema under [`version_sort_key`]
    Ceiling,
}

impl VersionKey {
    fn from_version(version: &str) -> Self {
        Version::parse(version)
            .map(VersionKey::Release)
            .unwrap_or(VersionKey::Unparseable)
    }
}

/// Default key: an unversioned schema sorts above every versioned one
pub fn version_sort_key(schema: &SchemaDocument) -> VersionKey {
    schema
        .version()
        .map(VersionKey::from_version)
        .unwrap_or(VersionKey::Ceiling)
}

/// Alternative key: an unversioned schema sorts below every versioned one
pub fn unversioned_lowest_key(schema: &SchemaDocument) -> VersionKey {
    schema
        .version()
        .map(VersionKey::from_version)
        .unwrap_or(VersionKey::Floor)
}

/// All discovered versions of one schema, in discovery order unless sorted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionSet {
    schemas: Vec<Rc<SchemaDocument>>,
}

impl VersionSet {
    pub fn new(schemas: Vec<Rc<SchemaDocument>>) -> Self {
        Self { schemas }
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Rc<SchemaDocument>> {
        self.schemas.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rc<SchemaDocument>> {
        self.schemas.iter()
    }

    /// Name shared by every element, if the set is not empty
    pub fn name(&self) -> Option<&str> {
        self.schemas.first().map(|schema| schema.name())
    }

    /// Subset whose versions satisfy `specifier`
    ///
    /// An unversioned schema is kept iff `match_unversioned` is set. A version
    /// that does not parse never matches.
    pub fn filtered(&self, specifier: &VersionSpecifier, match_unversioned: bool) -> VersionSet {
        let schemas = self
            .schemas
            .iter()
            .filter(|schema| match schema.version() {
                Some(version) => specifier.contains_str(version),
                None => match_unversioned,
            })
            .cloned()
            .collect();
        VersionSet { schemas }
    }

    /// Stable sort by `key`; equal keys keep their relative order in both
    /// directions
    pub fn sorted<S: SortKey + ?Sized>(&self, key: &S, reverse: bool) -> VersionSet {
        let mut keyed: Vec<(S::Key, Rc<SchemaDocument>)> = self
            .schemas
            .iter()
            .map(|schema| (key.key(schema), Rc::clone(schema)))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = a.cmp(b);
            if reverse {
                ordering.reverse()
            } else {
                ordering
            }
        });

        VersionSet {
            schemas: keyed.into_iter().map(|(_, schema)| schema).collect(),
        }
    }

    /// First schema in discovery order that satisfies `specifier`
    pub fn resolve(
        &self,
        specifier: &VersionSpecifier,
        match_unversioned: bool,
    ) -> Option<Rc<SchemaDocument>> {
        self.filtered(specifier, match_unversioned)
            .schemas
            .into_iter()
            .next()
    }

    /// First schema satisfying `specifier` after sorting by `key`
    pub fn resolve_sorted<S: SortKey + ?Sized>(
        &self,
        specifier: &VersionSpecifier,
        key: &S,
        reverse: bool,
        match_unversioned: bool,
    ) -> Option<Rc<SchemaDocument>> {
        self.filtered(specifier, match_unversioned)
            .sorted(key, reverse)
            .schemas
            .into_iter()
            .next()
    }

    /// Highest version satisfying `specifier` (any version when `None`)
    ///
    /// Unversioned schemas rank above all versions, so one is returned
    /// whenever present and `match_unversioned` is set.
    pub fn newest(
        &self,
        specifier: Option<&VersionSpecifier>,
        match_unversioned: bool,
    ) -> Option<Rc<SchemaDocument>> {
        self.by_version(specifier, match_unversioned, true)
    }

    /// Lowest version satisfying `specifier` (any version when `None`)
    pub fn oldest(
        &self,
        specifier: Option<&VersionSpecifier>,
        match_unversioned: bool,
    ) -> Option<Rc<SchemaDocument>> {
        self.by_version(specifier, match_unversioned, false)
    }

    fn by_version(
        &self,
        specifier: Option<&VersionSpecifier>,
        match_unversioned: bool,
        reverse: bool,
    ) -> Option<Rc<SchemaDocument>> {
        let any = VersionSpecifier::any();
        let specifier = specifier.unwrap_or(&any);
        self.resolve_sorted(specifier, &version_sort_key, reverse, match_unversioned)
    }
}

impl<'a> IntoIterator for &'a VersionSet {
    type Item = &'a Rc<SchemaDocument>;
    type IntoIter = std::slice::Iter<'a, Rc<SchemaDocument>>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemas.iter()
    }
}

impl IntoIterator for VersionSet {
    type Item = Rc<SchemaDocument>;
    type IntoIter = std::vec::IntoIter<Rc<SchemaDocument>>;

    fn into_iter(self) -> Self::IntoIter {
        self.schemas.into_iter()
    }
}

impl FromIterator<Rc<SchemaDocument>> for VersionSet {
    fn from_iter<I: IntoIterator<Item = Rc<SchemaDocument>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
