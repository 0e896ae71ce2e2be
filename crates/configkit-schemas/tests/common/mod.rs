//! Shared fixtures: the same five schemas laid out for each matcher convention

#![allow(dead_code)]

use configkit_schemas::{name_version_matcher, version_name_matcher, RegexMatcher, SchemaDirectory};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FILES: [(&str, &str); 5] = [
    ("config", "0.1"),
    ("config", "0.2"),
    ("config", "1.0"),
    ("credentials", "0.1"),
    ("credentials", "1.0"),
];

#[derive(Debug, Clone, Copy)]
pub enum Layout {
    /// `config-0.1.json`
    SameLevel,
    /// `0.1/config.json`
    VersionName,
    /// `config/0.1.json`
    NameVersion,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::SameLevel, Layout::VersionName, Layout::NameVersion];

    fn relative(&self, name: &str, version: &str) -> PathBuf {
        match self {
            Layout::SameLevel => PathBuf::from(format!("{}-{}.json", name, version)),
            Layout::VersionName => Path::new(version).join(format!("{}.json", name)),
            Layout::NameVersion => Path::new(name).join(format!("{}.json", version)),
        }
    }

    /// Copy the fixture schemas into a fresh temp dir and open it
    pub fn build(&self) -> (TempDir, SchemaDirectory) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("schemas");

        for (name, version) in FILES {
            let target = root.join(self.relative(name, version));
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            std::fs::copy(fixture(&format!("{}-{}.json", name, version)), &target).unwrap();
        }

        let directory = match self {
            Layout::SameLevel => SchemaDirectory::with_matcher(
                &root,
                RegexMatcher::new(r"(?P<name>[^/\\]+?)-(?P<version>[^/\\]+?)\.json$").unwrap(),
            ),
            Layout::VersionName => SchemaDirectory::with_matcher(&root, version_name_matcher()),
            Layout::NameVersion => SchemaDirectory::with_matcher(&root, name_version_matcher()),
        };
        (dir, directory)
    }
}

pub fn fixture(file: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("schemas")
        .join(file)
}

pub fn schema_id(name: &str, version: &str) -> String {
    format!("https://configkit.dev/test/schemas/{}/{}.json", version, name)
}
