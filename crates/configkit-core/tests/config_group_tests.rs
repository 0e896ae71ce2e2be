//! Config group resolution: file discovery, version choice, refresh and defaults

mod common;

use common::{Workspace, NAMES};
use configkit_core::schemas::{SchemaError, VersionSpecifier};
use configkit_core::{Error, RefreshOptions};
use pretty_assertions::assert_eq;
use serde_json::json;

fn spec(s: &str) -> VersionSpecifier {
    VersionSpecifier::parse(s).unwrap()
}

#[cfg(test)]
mod resolution {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_schema_name_has_an_entry() {
        let workspace = Workspace::new();
        let group = workspace.group();

        assert_eq!(group.keys().collect::<Vec<_>>(), NAMES.to_vec());
        assert_eq!(group.len(), NAMES.len());
        for name in NAMES {
            assert_eq!(group.configs()[name], json!({}), "{}", name);
        }
        assert!(!group.contains_key("missing"));
    }

    #[test]
    fn test_loads_file_through_newest_schema() {
        let workspace = Workspace::new();
        let server = json!({"host": "h", "port": 80, "workers": ["w1"]});
        workspace.write_json("server", &server);

        let group = workspace.group();
        assert_eq!(group.configs()["server"], server);
        assert_eq!(group.get("server").unwrap().unwrap().to_value().unwrap(), server);
    }

    #[test]
    fn test_newest_schema_validates() {
        let workspace = Workspace::new();
        workspace.write_json("server", &json!({"host": "h"}));

        // 2.0 requires a port
        let err = workspace.builder().build().unwrap_err();
        let failure = err.schema_error().and_then(SchemaError::validation_failure).unwrap();
        assert_eq!(
            failure.schema_id.as_deref(),
            Some("https://configkit.dev/test/core/2.0/server.json")
        );

        let group = workspace.builder().version_spec(spec("<2")).build().unwrap();
        assert_eq!(group.configs()["server"], json!({"host": "h"}));
    }

    #[test]
    fn test_no_compatible_schema_for_existing_file() {
        let workspace = Workspace::new();
        let group = workspace.builder().version_spec(spec(">=3")).build().unwrap();
        assert_eq!(group.configs()["server"], json!({}));

        workspace.write_json("server", &json!({"host": "h", "port": 1}));
        match workspace.builder().version_spec(spec(">=3")).build() {
            Err(Error::NoCompatibleSchema { name, specifier, path }) => {
                assert_eq!(name, "server");
                assert_eq!(specifier, ">=3");
                assert_eq!(path, workspace.config_dir().join("server.json"));
            }
            other => panic!("expected NoCompatibleSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_extension_surfaces() {
        let workspace = Workspace::new();
        workspace.write("server.ini", "host = h");
        let err = workspace.builder().build().unwrap_err();
        assert!(matches!(err.schema_error(), Some(SchemaError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_missing_config_dir_gives_empty_configs() {
        let workspace = Workspace::new();
        std::fs::remove_dir(workspace.config_dir()).unwrap();
        let group = workspace.group();
        assert_eq!(group.len(), NAMES.len());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_config() {
        let workspace = Workspace::new();
        workspace.write("server.yml", "host: h\nport: 8080\n");
        let group = workspace.group();
        assert_eq!(group.configs()["server"], json!({"host": "h", "port": 8080}));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_config() {
        let workspace = Workspace::new();
        workspace.write("database.toml", "user = \"app\"\npassword = \"secret\"\n");
        let group = workspace.group();
        assert_eq!(group.configs()["database"], json!({"user": "app", "password": "secret"}));
    }
}

#[cfg(test)]
mod refresh {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_each_refresh_scans_once() {
        let workspace = Workspace::new();
        let mut group = workspace.group();
        assert_eq!(group.directory().scan_count(), 1);

        group.refresh(RefreshOptions::default()).unwrap();
        assert_eq!(group.directory().scan_count(), 2);
    }

    #[test]
    fn test_refresh_picks_up_new_files() {
        let workspace = Workspace::new();
        let mut group = workspace.group();
        assert_eq!(group.configs()["config"], json!({}));

        workspace.write_json("config", &json!({"host": "x"}));
        group.refresh(RefreshOptions::default()).unwrap();
        assert_eq!(group.configs()["config"], json!({"host": "x"}));
    }

    #[test]
    fn test_failed_refresh_keeps_previous_configs() {
        let workspace = Workspace::new();
        workspace.write_json("server", &json!({"host": "h", "port": 1}));
        let mut group = workspace.group();

        workspace.write_json("server", &json!({"host": 5}));
        assert!(group.refresh(RefreshOptions::default()).is_err());
        assert_eq!(group.configs()["server"], json!({"host": "h", "port": 1}));
    }

    #[test]
    fn test_overrides_apply_to_one_refresh() {
        let workspace = Workspace::new();
        let other = Workspace::new();
        other.write_json("config", &json!({"host": "other"}));
        let mut group = workspace.group();

        group
            .refresh(RefreshOptions::new().with_config_path(other.config_dir()))
            .unwrap();
        assert_eq!(group.configs()["config"], json!({"host": "other"}));
        assert_eq!(group.config_path(), workspace.config_dir());

        group.refresh(RefreshOptions::default()).unwrap();
        assert_eq!(group.configs()["config"], json!({}));
    }

    #[test]
    fn test_version_spec_override() {
        let workspace = Workspace::new();
        workspace.write_json("server", &json!({"host": "h"}));
        let mut group = workspace.builder().version_spec(spec("<2")).build().unwrap();

        let err = group
            .refresh(RefreshOptions::new().with_version_spec(spec("==2.0")))
            .unwrap_err();
        assert!(err.schema_error().is_some());
        assert_eq!(group.version_spec().to_string(), "<2");
    }
}

#[cfg(test)]
mod defaults {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_pairs_become_top_level_names() {
        let workspace = Workspace::new();
        workspace.write_json("base", &json!({"region": "eu", "server": {"host": "from-base"}}));
        workspace.write_json("server", &json!({"host": "h", "port": 1}));

        let group = workspace.builder().default_name("base").build().unwrap();
        assert_eq!(group.configs()["region"], json!("eu"));
        assert_eq!(group.configs()["server"], json!({"host": "from-base"}));
        assert_eq!(group.configs()["base"]["region"], json!("eu"));
        assert_eq!(group.len(), NAMES.len() + 1);
        assert_eq!(group.default_name(), Some("base"));
    }

    #[test]
    fn test_absent_default_is_ignored() {
        let workspace = Workspace::new();
        let group = workspace.builder().default_name("nothing").build().unwrap();
        assert_eq!(group.len(), NAMES.len());
    }

    #[test]
    fn test_default_given_at_refresh() {
        let workspace = Workspace::new();
        workspace.write_json("base", &json!({"region": "eu"}));
        let mut group = workspace.group();
        assert!(!group.contains_key("region"));

        group
            .refresh(RefreshOptions::new().with_default("base"))
            .unwrap();
        assert!(group.contains_key("region"));
    }
}
