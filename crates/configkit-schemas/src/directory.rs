//! Schema directory scanning with scoped scan caches
//!
//! A [`SchemaDirectory`] walks its root at most once per cache scope. Every
//! query opens a private scope when none is active, so a single query scans
//! exactly once; callers batch several queries over one scan with
//! [`SchemaDirectory::use_cache`].
//!
//! Directories share state through `Rc` and are not thread-safe.
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

use crate::error::{SchemaError, SchemaResult};
use crate::matchers::{version_name_matcher, Matcher};
use crate::schema::SchemaDocument;
use crate::versioning::VersionSpecifier;
use crate::versions::{SortKey, VersionSet};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Result of one full walk: schema name -> documents in discovery order
#[derive(Debug, Default)]
struct Catalog {
    names: Vec<String>,
    buckets: HashMap<String, Vec<Rc<SchemaDocument>>>,
}

impl Catalog {
    fn push(&mut self, schema: Rc<SchemaDocument>) {
        let name = schema.name().to_string();
        match self.buckets.get_mut(&name) {
            Some(bucket) => bucket.push(schema),
            None => {
                self.names.push(name.clone());
                self.buckets.insert(name, vec![schema]);
            }
        }
    }

    fn version_set(&self, name: &str) -> Option<VersionSet> {
        self.buckets.get(name).map(|bucket| VersionSet::new(bucket.clone()))
    }

    /// Every document in discovery order
    fn documents(&self) -> impl Iterator<Item = &Rc<SchemaDocument>> {
        self.names
            .iter()
            .filter_map(|name| self.buckets.get(name))
            .flatten()
    }
}

/// Cache slot that is empty until a scan fills it
///
/// Clones share the same slot, so one cache can be reinstalled across
/// several scopes.
#[derive(Debug, Clone, Default)]
pub struct ScanCache(Rc<RefCell<Option<Rc<Catalog>>>>);

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a scan has completed into this cache
    pub fn is_filled(&self) -> bool {
        self.0.borrow().is_some()
    }

    fn get(&self) -> Option<Rc<Catalog>> {
        self.0.borrow().clone()
    }

    fn fill(&self, catalog: Rc<Catalog>) {
        *self.0.borrow_mut() = Some(catalog);
    }
}

pub(crate) struct DirectoryInner {
    root: PathBuf,
    matcher: Box<dyn Matcher>,
    cache: RefCell<Option<ScanCache>>,
    scans: Cell<usize>,
}

/// Read-only mapping from schema name to [`VersionSet`], backed by a
/// filesystem tree
#[derive(Clone)]
pub struct SchemaDirectory {
    inner: Rc<DirectoryInner>,
}

/// Guard returned by [`SchemaDirectory::use_cache`]
///
/// Restores the previously active cache, possibly none, when dropped.
#[must_use = "the cache scope ends as soon as the guard is dropped"]
pub struct CacheScope<'a> {
    inner: &'a DirectoryInner,
    previous: Option<ScanCache>,
}

impl Drop for CacheScope<'_> {
    fn drop(&mut self) {
        debug!(root = %self.inner.root.display(), "Leaving schema cache scope");
        *self.inner.cache.borrow_mut() = self.previous.take();
    }
}

impl SchemaDirectory {
    /// Directory whose schemas are laid out as `<version>/<name>.json`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_matcher(root, version_name_matcher())
    }

    pub fn with_matcher(root: impl Into<PathBuf>, matcher: impl Matcher + 'static) -> Self {
        Self {
            inner: Rc::new(DirectoryInner {
                root: root.into(),
                matcher: Box::new(matcher),
                cache: RefCell::new(None),
                scans: Cell::new(0),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<DirectoryInner>) -> Self {
        Self { inner }
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Number of filesystem walks performed so far
    pub fn scan_count(&self) -> usize {
        self.inner.scans.get()
    }

    /// Open a scope with a fresh cache; queries inside it share one scan
    pub fn use_cache(&self) -> CacheScope<'_> {
        self.use_cache_with(&ScanCache::new())
    }

    /// Open a scope that installs `cache`, which may already be filled
    pub fn use_cache_with(&self, cache: &ScanCache) -> CacheScope<'_> {
        debug!(root = %self.inner.root.display(), filled = cache.is_filled(), "Entering schema cache scope");
        let previous = self.inner.cache.replace(Some(cache.clone()));
        CacheScope {
            inner: &self.inner,
            previous,
        }
    }

    /// Run `f` inside a fresh cache scope
    pub fn with_cache<T>(&self, f: impl FnOnce(&Self) -> T) -> T {
        let _scope = self.use_cache();
        f(self)
    }

    /// Reuse the active cache, or install a temporary one for the caller
    fn ensure_cache(&self) -> (ScanCache, Option<CacheScope<'_>>) {
        let active = self.inner.cache.borrow().clone();
        match active {
            Some(cache) => (cache, None),
            None => {
                let cache = ScanCache::new();
                let scope = self.use_cache_with(&cache);
                (cache, Some(scope))
            }
        }
    }

    /// Scanned catalog, walking the tree only if the active cache is empty
    fn catalog(&self) -> SchemaResult<Rc<Catalog>> {
        let (cache, _scope) = self.ensure_cache();
        if let Some(catalog) = cache.get() {
            return Ok(catalog);
        }
        let catalog = Rc::new(self.walk()?);
        cache.fill(Rc::clone(&catalog));
        Ok(catalog)
    }

    /// Walk the tree now and return every schema found, in discovery order
    ///
    /// The result replaces the contents of the active cache, if any.
    pub fn scan(&self) -> SchemaResult<Vec<Rc<SchemaDocument>>> {
        let catalog = Rc::new(self.walk()?);
        if let Some(cache) = self.inner.cache.borrow().as_ref() {
            cache.fill(Rc::clone(&catalog));
        }
        Ok(catalog.documents().cloned().collect())
    }

    fn walk(&self) -> SchemaResult<Catalog> {
        let root = &self.inner.root;
        self.inner.scans.set(self.inner.scans.get() + 1);

        let mut catalog = Catalog::default();
        let mut skipped = 0usize;

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| SchemaError::WalkError {
                path: root.clone(),
                source: e,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = relative_path(root, entry.path());
            let Some(info) = self.inner.matcher.check(&relative) else {
                continue;
            };

            let content = std::fs::read_to_string(entry.path())
                .map_err(|e| SchemaError::io_error(entry.path(), e))?;
            let definition: Value = serde_json::from_str(&content)
                .map_err(|e| SchemaError::json_parse_error(entry.path(), e))?;

            if !SchemaDocument::check(&definition) {
                debug!(path = %relative, "Skipping file that is not a valid schema");
                skipped += 1;
                continue;
            }

            catalog.push(Rc::new(SchemaDocument::new(
                definition,
                info,
                Rc::downgrade(&self.inner),
            )));
        }

        info!(
            root = %root.display(),
            names = catalog.names.len(),
            skipped,
            "Scanned schema directory"
        );
        Ok(catalog)
    }

    /// All versions of `name`
    pub fn get(&self, name: &str) -> SchemaResult<Option<VersionSet>> {
        Ok(self.catalog()?.version_set(name))
    }

    /// Number of distinct schema names
    pub fn len(&self) -> SchemaResult<usize> {
        Ok(self.catalog()?.names.len())
    }

    pub fn is_empty(&self) -> SchemaResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, name: &str) -> SchemaResult<bool> {
        Ok(self.catalog()?.buckets.contains_key(name))
    }

    /// Schema names in discovery order
    pub fn keys(&self) -> SchemaResult<impl Iterator<Item = String>> {
        let catalog = self.catalog()?;
        Ok((0..catalog.names.len()).map(move |i| catalog.names[i].clone()))
    }

    pub fn values(&self) -> SchemaResult<impl Iterator<Item = VersionSet>> {
        Ok(self.iter()?.map(|(_, versions)| versions))
    }

    /// `(name, versions)` pairs in discovery order
    pub fn iter(&self) -> SchemaResult<impl Iterator<Item = (String, VersionSet)>> {
        let catalog = self.catalog()?;
        Ok((0..catalog.names.len()).filter_map(move |i| {
            let name = &catalog.names[i];
            catalog
                .version_set(name)
                .map(|versions| (name.clone(), versions))
        }))
    }

    /// Every schema across all names, skipping documents whose `$id` was
    /// already produced; documents without an `$id` are always yielded
    pub fn schemas(&self, version_spec: Option<&VersionSpecifier>) -> SchemaResult<Schemas> {
        let sets = self
            .values()?
            .map(|versions| match version_spec {
                Some(spec) => versions.filtered(spec, true),
                None => versions,
            })
            .collect();
        Ok(Schemas::new(sets))
    }

    /// Like [`schemas`](Self::schemas), sorting each name's versions by `key`
    pub fn schemas_sorted<S: SortKey + ?Sized>(
        &self,
        version_spec: Option<&VersionSpecifier>,
        key: &S,
        reverse: bool,
    ) -> SchemaResult<Schemas> {
        let sets = self
            .schemas(version_spec)?
            .sets
            .map(|versions| versions.sorted(key, reverse))
            .collect();
        Ok(Schemas::new(sets))
    }
}

impl fmt::Debug for SchemaDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDirectory")
            .field("root", &self.inner.root)
            .field("scans", &self.inner.scans.get())
            .finish()
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lazy, deduplicated iterator returned by [`SchemaDirectory::schemas`]
pub struct Schemas {
    sets: std::vec::IntoIter<VersionSet>,
    current: std::vec::IntoIter<Rc<SchemaDocument>>,
    seen: HashSet<Rc<SchemaDocument>>,
}

impl Schemas {
    fn new(sets: Vec<VersionSet>) -> Self {
        Self {
            sets: sets.into_iter(),
            current: Vec::new().into_iter(),
            seen: HashSet::new(),
        }
    }
}

impl Iterator for Schemas {
    type Item = Rc<SchemaDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for schema in self.current.by_ref() {
                if self.seen.insert(Rc::clone(&schema)) {
                    return Some(schema);
                }
            }
            self.current = self.sets.next()?.into_iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_schema(root: &Path, relative: &str, definition: &Value) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, serde_json::to_string(definition).unwrap()).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        for version in ["0.1", "1.0"] {
            write_schema(
                dir.path(),
                &format!("{}/app.json", version),
                &json!({"$id": format!("urn:app:{}", version), "type": "object"}),
            );
        }
        dir
    }

    #[test]
    fn test_each_query_scans_once() {
        let dir = fixture();
        let directory = SchemaDirectory::new(dir.path());

        assert_eq!(directory.len().unwrap(), 1);
        assert_eq!(directory.scan_count(), 1);

        assert!(directory.contains("app").unwrap());
        assert_eq!(directory.scan_count(), 2);
    }

    #[test]
    fn test_scope_restores_previous_cache() {
        let dir = fixture();
        let directory = SchemaDirectory::new(dir.path());

        {
            let _outer = directory.use_cache();
            directory.len().unwrap();
            {
                let _inner = directory.use_cache();
                directory.len().unwrap();
                assert_eq!(directory.scan_count(), 2);
            }
            directory.keys().unwrap().for_each(drop);
            assert_eq!(directory.scan_count(), 2);
        }

        directory.len().unwrap();
        assert_eq!(directory.scan_count(), 3);
    }

    #[test]
    fn test_scope_restored_on_error() {
        let directory = SchemaDirectory::new("/nonexistent/configkit/schemas");
        let result: SchemaResult<usize> = directory.with_cache(|d| {
            let n = d.len()?;
            Ok(n)
        });
        assert!(matches!(result, Err(SchemaError::WalkError { .. })));
        assert!(directory.inner.cache.borrow().is_none());
    }

    #[test]
    fn test_shared_cache_across_scopes() {
        let dir = fixture();
        let directory = SchemaDirectory::new(dir.path());
        let cache = ScanCache::new();

        {
            let _scope = directory.use_cache_with(&cache);
            directory.len().unwrap();
        }
        assert!(cache.is_filled());
        {
            let _scope = directory.use_cache_with(&cache);
            directory.get("app").unwrap();
        }
        assert_eq!(directory.scan_count(), 1);
    }

    #[test]
    fn test_invalid_schemas_are_skipped_and_bad_json_propagates() {
        let dir = fixture();
        write_schema(dir.path(), "2.0/app.json", &json!({"type": 42}));
        let directory = SchemaDirectory::new(dir.path());
        assert_eq!(directory.get("app").unwrap().unwrap().len(), 2);

        std::fs::create_dir_all(dir.path().join("3.0")).unwrap();
        std::fs::write(dir.path().join("3.0").join("broken.json"), "{").unwrap();
        assert!(matches!(
            directory.len(),
            Err(SchemaError::JsonParseError { .. })
        ));
    }

    #[test]
    fn test_documents_hold_weak_directory_reference() {
        let dir = fixture();
        let directory = SchemaDirectory::new(dir.path());
        let schema = directory.get("app").unwrap().unwrap().get(0).cloned().unwrap();
        assert_eq!(schema.directory().unwrap().root(), dir.path());

        drop(directory);
        assert!(schema.directory().is_none());
    }
}
