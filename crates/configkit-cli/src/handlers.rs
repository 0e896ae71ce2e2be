//! Command handlers for CLI subcommands
//!
//! Copyright (c) 2025 Configkit Team
//! Licensed under the Apache-2.0 license

mod completions;
mod get;
mod resolve;
mod schemas;
mod validate;

pub use completions::handle_completions;
pub use get::handle_get;
pub use resolve::handle_resolve;
pub use schemas::{handle_schemas, list_schemas, SchemaRow};
pub use validate::handle_validate;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{
        CompletionsArgs, GetArgs, GroupArgs, OutputFormat, ResolveArgs, SchemaArgs, SchemasArgs, Shell,
        ValidateArgs,
    };
    use crate::config::Settings;
    use crate::error::Error;
    use crate::output::tests::SharedBuffer;
    use crate::output::OutputWriter;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write(path: &Path, value: &Value) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn server_schema(version: &str, required: &[&str]) -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "$id": format!("https://configkit.dev/test/cli/{}/server.json", version),
            "type": "object",
            "properties": {
                "host": {"type": "string"},
                "port": {"type": ["integer", "string"]},
                "url": {"type": "string"}
            },
            "required": required
        })
    }

    /// Schema tree with server 1.0/2.0 and database 1.0, plus a config dir
    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let schemas = dir.path().join("schemas");
            write(&schemas.join("1.0/server.json"), &server_schema("1.0", &["host"]));
            write(&schemas.join("2.0/server.json"), &server_schema("2.0", &["host", "port"]));
            write(
                &schemas.join("1.0/database.json"),
                &json!({
                    "$id": "https://configkit.dev/test/cli/1.0/database.json",
                    "type": "object",
                    "properties": {"password": {"type": "string"}, "dsn": {"type": "string"}}
                }),
            );
            std::fs::create_dir(dir.path().join("config")).unwrap();
            Self { dir }
        }

        fn config(&self, name: &str, value: &Value) -> PathBuf {
            let path = self.dir.path().join("config").join(format!("{}.json", name));
            write(&path, value);
            path
        }

        fn settings(&self) -> Settings {
            Settings {
                schema_dir: self.dir.path().join("schemas"),
                config_dir: self.dir.path().join("config"),
                ..Settings::default()
            }
        }
    }

    fn writer(format: OutputFormat) -> (OutputWriter, SharedBuffer) {
        let buffer = SharedBuffer::default();
        (
            OutputWriter::with_writer(format, false, false, Box::new(buffer.clone())),
            buffer,
        )
    }

    fn group_args() -> GroupArgs {
        GroupArgs::default()
    }

    #[test]
    fn test_schemas_lists_newest_first() {
        let fixture = Fixture::new();
        let (mut out, buffer) = writer(OutputFormat::Json);
        let args = SchemasArgs {
            schema: SchemaArgs::default(),
            name: None,
        };
        handle_schemas(args, &fixture.settings(), &mut out).unwrap();

        let rows: Value = serde_json::from_str(&buffer.contents()).unwrap();
        let listed: Vec<(String, String)> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|row| {
                (
                    row["name"].as_str().unwrap().to_string(),
                    row["version"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            listed,
            vec![
                ("database".to_string(), "1.0".to_string()),
                ("server".to_string(), "2.0".to_string()),
                ("server".to_string(), "1.0".to_string()),
            ]
        );
    }

    #[test]
    fn test_schemas_filters_by_name_and_spec() {
        let fixture = Fixture::new();
        let settings = Settings {
            version_spec: Some("<2".to_string()),
            ..fixture.settings()
        };

        let rows = list_schemas(&settings, Some("server")).unwrap();
        assert_eq!(
            rows,
            vec![SchemaRow {
                name: "server".to_string(),
                version: Some("1.0".to_string()),
                id: Some("https://configkit.dev/test/cli/1.0/server.json".to_string()),
            }]
        );
        assert!(matches!(
            list_schemas(&settings, Some("cache")),
            Err(Error::SchemaNotFound { .. })
        ));
    }

    #[test]
    fn test_schemas_human_table() {
        let fixture = Fixture::new();
        let (mut out, buffer) = writer(OutputFormat::Human);
        let args = SchemasArgs {
            schema: SchemaArgs::default(),
            name: Some("database".to_string()),
        };
        handle_schemas(args, &fixture.settings(), &mut out).unwrap();

        let contents = buffer.contents();
        assert!(contents.contains("NAME"));
        assert!(contents.contains("database │ 1.0"));
        assert!(contents.ends_with("1 schema version(s)\n"));
    }

    #[test]
    fn test_resolve_substitutes_and_redacts() {
        let fixture = Fixture::new();
        fixture.config("server", &json!({"host": "db", "port": 1, "url": "http://${{server.host}}"}));
        fixture.config("database", &json!({"password": "hunter2", "dsn": "${{server.url}}"}));

        let (mut out, buffer) = writer(OutputFormat::Json);
        let args = ResolveArgs {
            group: group_args(),
            name: None,
            raw: false,
            show_secrets: false,
        };
        handle_resolve(args, &fixture.settings(), &mut out).unwrap();

        let value: Value = serde_json::from_str(&buffer.contents()).unwrap();
        assert_eq!(
            value,
            json!({
                "database": {"password": "***", "dsn": "http://db"},
                "server": {"host": "db", "port": 1, "url": "http://db"}
            })
        );
    }

    #[test]
    fn test_resolve_single_raw_config() {
        let fixture = Fixture::new();
        fixture.config("database", &json!({"password": "hunter2", "dsn": "${{server.url}}"}));

        let (mut out, buffer) = writer(OutputFormat::Json);
        let args = ResolveArgs {
            group: group_args(),
            name: Some("database".to_string()),
            raw: true,
            show_secrets: true,
        };
        handle_resolve(args, &fixture.settings(), &mut out).unwrap();
        assert_eq!(
            buffer.contents(),
            "{\"password\":\"hunter2\",\"dsn\":\"${{server.url}}\"}\n"
        );

        let (mut out, _) = writer(OutputFormat::Json);
        let args = ResolveArgs {
            group: group_args(),
            name: Some("cache".to_string()),
            raw: false,
            show_secrets: false,
        };
        assert!(matches!(
            handle_resolve(args, &fixture.settings(), &mut out),
            Err(Error::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_reports_cycles() {
        let fixture = Fixture::new();
        fixture.config("server", &json!({"host": "h", "port": 1, "url": "${{database.dsn}}"}));
        fixture.config("database", &json!({"dsn": "${{server.url}}"}));

        let (mut out, _) = writer(OutputFormat::Json);
        let args = ResolveArgs {
            group: group_args(),
            name: None,
            raw: false,
            show_secrets: false,
        };
        let err = handle_resolve(args, &fixture.settings(), &mut out).unwrap_err();
        assert!(matches!(
            err,
            Error::Core(configkit_core::Error::CyclicSubstitution { .. })
        ));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_get_prints_resolved_value() {
        let fixture = Fixture::new();
        fixture.config("server", &json!({"host": "db", "port": 5432, "url": "${{server.host}}:${{server.port}}"}));

        let (mut out, buffer) = writer(OutputFormat::Human);
        let args = GetArgs {
            path: "server.url".to_string(),
            group: group_args(),
        };
        handle_get(args, &fixture.settings(), &mut out).unwrap();
        assert_eq!(buffer.contents(), "db:5432\n");

        let (mut out, _) = writer(OutputFormat::Human);
        let args = GetArgs {
            path: " ".to_string(),
            group: group_args(),
        };
        assert!(matches!(
            handle_get(args, &fixture.settings(), &mut out),
            Err(Error::InvalidArgs(_))
        ));
    }

    #[test]
    fn test_get_uses_command_line_version_spec() {
        let fixture = Fixture::new();
        fixture.config("server", &json!({"host": "db"}));

        let (mut out, _) = writer(OutputFormat::Json);
        let args = GetArgs {
            path: "server.host".to_string(),
            group: group_args(),
        };
        assert!(handle_get(args, &fixture.settings(), &mut out).is_err());

        let (mut out, buffer) = writer(OutputFormat::Json);
        let args = GetArgs {
            path: "server.host".to_string(),
            group: GroupArgs {
                schema: SchemaArgs {
                    schema_dir: None,
                    version_spec: Some("<2".to_string()),
                },
                ..GroupArgs::default()
            },
        };
        handle_get(args, &fixture.settings(), &mut out).unwrap();
        assert_eq!(buffer.contents(), "\"db\"\n");
    }

    #[test]
    fn test_validate_success_and_failure() {
        let fixture = Fixture::new();
        let valid = fixture.config("server", &json!({"host": "h", "port": 1}));
        let (mut out, buffer) = writer(OutputFormat::Human);
        let args = ValidateArgs {
            name: "server".to_string(),
            file: valid,
            schema: SchemaArgs::default(),
            detailed: false,
        };
        handle_validate(args, &fixture.settings(), &mut out).unwrap();
        assert!(buffer.contents().contains("✓ Config is valid"));

        let invalid = fixture.config("server", &json!({"host": "h"}));
        let (mut out, buffer) = writer(OutputFormat::Human);
        let args = ValidateArgs {
            name: "server".to_string(),
            file: invalid.clone(),
            schema: SchemaArgs::default(),
            detailed: false,
        };
        match handle_validate(args, &fixture.settings(), &mut out) {
            Err(Error::ValidationFailed { path, count }) => {
                assert_eq!(path, invalid);
                assert_eq!(count, 1);
            }
            other => panic!("expected ValidationFailed, got {:?}", other),
        }
        let contents = buffer.contents();
        assert!(contents.contains("ERROR: ✗ Config validation failed"));
        assert!(contents.contains("Schema: https://configkit.dev/test/cli/2.0/server.json"));
        assert!(contents.contains("1 violation(s):"));
    }

    #[test]
    fn test_validate_lookup_errors() {
        let fixture = Fixture::new();
        let file = fixture.config("server", &json!({"host": "h"}));

        let run = |name: &str, file: PathBuf, version_spec: Option<&str>| {
            let (mut out, _) = writer(OutputFormat::Json);
            let args = ValidateArgs {
                name: name.to_string(),
                file,
                schema: SchemaArgs {
                    schema_dir: None,
                    version_spec: version_spec.map(str::to_string),
                },
                detailed: false,
            };
            handle_validate(args, &fixture.settings(), &mut out)
        };

        assert!(matches!(run("cache", file.clone(), None), Err(Error::SchemaNotFound { .. })));
        assert!(matches!(
            run("server", file.clone(), Some(">=3")),
            Err(Error::NoCompatibleVersion { .. })
        ));
        assert!(matches!(
            run("server", fixture.dir.path().join("absent.json"), None),
            Err(Error::FileNotFound { .. })
        ));
        assert!(run("server", file, Some("<2")).is_ok());
    }

    #[test]
    fn test_completions_mention_subcommands() {
        let mut out = Vec::new();
        handle_completions(CompletionsArgs { shell: Shell::Bash }, &mut out).unwrap();
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("configkit"));
        assert!(script.contains("validate"));
    }
}
