//! Shared fixtures: a fixed schema tree and a scratch config directory

#![allow(dead_code)]

use configkit_core::schemas::SchemaDirectory;
use configkit_core::{ConfigGroup, ConfigGroupBuilder};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Names in discovery order for the fixture tree
pub const NAMES: [&str; 5] = ["base", "config", "database", "list", "server"];

pub fn schema_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("schemas")
}

/// Scratch config directory next to the read-only schema fixtures
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("config")).unwrap();
        Self { dir }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    pub fn write(&self, file: &str, contents: &str) -> PathBuf {
        let path = self.config_dir().join(file);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        self.write(&format!("{}.json", name), &serde_json::to_string_pretty(value).unwrap())
    }

    pub fn builder(&self) -> ConfigGroupBuilder {
        ConfigGroup::builder(SchemaDirectory::new(schema_root()), self.config_dir())
    }

    pub fn group(&self) -> ConfigGroup {
        self.builder().build().unwrap()
    }
}
