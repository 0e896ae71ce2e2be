//! Config loading and validation through discovered schemas

mod common;

use common::Layout;
use configkit_schemas::{LoadOptions, ParserError, SchemaDirectory, SchemaDocument, SchemaError};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

fn newest(directory: &SchemaDirectory, name: &str) -> Rc<SchemaDocument> {
    directory
        .get(name)
        .unwrap()
        .unwrap()
        .newest(None, true)
        .unwrap()
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "").unwrap();
    path
}

fn valid_config() -> Value {
    json!({
        "keep_alive": false,
        "resources": ["sugar", {"type": "static", "name": "spice"}]
    })
}

fn valid_credentials() -> Value {
    json!({"client_id": "$foo$", "secret_key": "!bar!"})
}

#[cfg(test)]
mod valid_documents {
    use super::*;

    #[test]
    fn test_load_valid_config() {
        let (dir, directory) = Layout::VersionName.build();
        let path = write_json(dir.path(), "config.json", &valid_config());
        assert_eq!(newest(&directory, "config").load(&path).unwrap(), valid_config());
    }

    #[test]
    fn test_load_valid_credentials() {
        let (dir, directory) = Layout::SameLevel.build();
        let path = write_json(dir.path(), "credentials.json", &valid_credentials());
        assert_eq!(
            newest(&directory, "credentials").load(&path).unwrap(),
            valid_credentials()
        );
    }

    #[test]
    fn test_refs_resolve_across_files_by_id() {
        let (dir, directory) = Layout::NameVersion.build();
        let mut config = valid_config();
        config["credentials"] = valid_credentials();
        let path = write_json(dir.path(), "config.json", &config);

        assert_eq!(newest(&directory, "config").load(&path).unwrap(), config);

        config["credentials"] = json!({"client_id": "$foo!"});
        let path = write_json(dir.path(), "config.json", &config);
        let err = newest(&directory, "config").load(&path).unwrap_err();
        let failure = err.validation_failure().unwrap();
        assert!(failure
            .violations
            .iter()
            .all(|v| v.instance_path.starts_with("/credentials")));
    }

    #[test]
    fn test_load_inside_cache_scope_does_not_rescan() {
        let (dir, directory) = Layout::VersionName.build();
        let path = write_json(dir.path(), "config.json", &valid_config());

        let _scope = directory.use_cache();
        let schema = newest(&directory, "config");
        schema.load(&path).unwrap();
        schema.load(&path).unwrap();
        assert_eq!(directory.scan_count(), 1);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_load_yaml() {
        let (dir, directory) = Layout::VersionName.build();
        let path = dir.path().join("credentials.yml");
        std::fs::write(&path, "client_id: $foo$\nsecret_key: '!bar!'\n").unwrap();
        assert_eq!(
            newest(&directory, "credentials").load(&path).unwrap(),
            valid_credentials()
        );
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_load_toml() {
        let (dir, directory) = Layout::VersionName.build();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "keep_alive = false\nresources = [\"sugar\", { type = \"static\", name = \"spice\" }]\n",
        )
        .unwrap();
        assert_eq!(newest(&directory, "config").load(&path).unwrap(), valid_config());
    }
}

#[cfg(test)]
mod invalid_documents {
    use super::*;

    #[test]
    fn test_load_invalid_config() {
        let (dir, directory) = Layout::VersionName.build();
        let path = write_json(dir.path(), "config.json", &json!({"keep_alive": true}));

        let err = newest(&directory, "config").load(&path).unwrap_err();
        assert!(matches!(err, SchemaError::ValidationError { .. }));
        let failure = err.validation_failure().unwrap();
        assert!(failure.has_violation_at("/keep_alive"));
        assert_eq!(err.path(), Some(path.as_path()));
    }

    #[test]
    fn test_load_invalid_credentials() {
        let (dir, directory) = Layout::VersionName.build();
        let path = write_json(dir.path(), "credentials.json", &json!({"client_id": "$foo!"}));

        let err = newest(&directory, "credentials").load(&path).unwrap_err();
        assert!(err.validation_failure().unwrap().has_violation_at("/client_id"));
    }

    #[test]
    fn test_unknown_suffix_is_unsupported() {
        let (dir, directory) = Layout::VersionName.build();
        let schema = newest(&directory, "config");

        for name in ["config.xyz", "config"] {
            let path = touch(dir.path(), name);
            assert!(
                matches!(schema.load(&path), Err(SchemaError::UnsupportedFormat { .. })),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_unknown_suffix_fails_before_reading() {
        let (dir, directory) = Layout::VersionName.build();
        let err = newest(&directory, "config")
            .load(dir.path().join("never-written.xyz"))
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_custom_loader_with_unknown_suffix() {
        let (dir, directory) = Layout::VersionName.build();
        let schema = newest(&directory, "config");
        let calls = std::cell::Cell::new(0);
        let loader = |_text: &str| -> Result<Value, ParserError> {
            calls.set(calls.get() + 1);
            Ok(valid_config())
        };

        for name in ["config.xyz", "config"] {
            let path = touch(dir.path(), name);
            let loaded = schema
                .load_with(&path, LoadOptions::default().with_parser(&loader))
                .unwrap();
            assert_eq!(loaded, valid_config());
        }
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_custom_loader_errors_are_reported() {
        let (dir, directory) = Layout::VersionName.build();
        let path = touch(dir.path(), "config.ini");
        let loader = |_text: &str| -> Result<Value, ParserError> { Err("unterminated section".into()) };

        let err = newest(&directory, "config")
            .load_with(&path, LoadOptions::default().with_parser(&loader))
            .unwrap_err();
        assert!(matches!(err, SchemaError::CustomParseError { .. }));
        assert!(err.to_string().contains("unterminated section"));
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn test_yaml_requires_feature() {
        let (dir, directory) = Layout::VersionName.build();
        let path = touch(dir.path(), "config.yaml");
        let err = newest(&directory, "config").load(&path).unwrap_err();
        assert!(matches!(err, SchemaError::MissingDependency { format: "YAML", feature: "yaml", .. }));
    }

    #[cfg(not(feature = "toml"))]
    #[test]
    fn test_toml_requires_feature() {
        let (dir, directory) = Layout::VersionName.build();
        let path = touch(dir.path(), "config.toml");
        let err = newest(&directory, "config").load(&path).unwrap_err();
        assert!(matches!(err, SchemaError::MissingDependency { format: "TOML", feature: "toml", .. }));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_empty_yaml_fails_validation() {
        let (dir, directory) = Layout::VersionName.build();
        let path = touch(dir.path(), "config.yaml");
        let err = newest(&directory, "config").load(&path).unwrap_err();
        assert!(matches!(err, SchemaError::ValidationError { .. }));
    }

    #[test]
    fn test_malformed_json_config() {
        let dir = TempDir::new().unwrap();
        let (_schemas, directory) = Layout::VersionName.build();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"keep_alive\": ").unwrap();
        let err = newest(&directory, "config").load(&path).unwrap_err();
        assert!(matches!(err, SchemaError::JsonParseError { .. }));
    }
}
