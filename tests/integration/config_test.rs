//! Config file tests: defaults slide under explicit fragments.

use super::common::Harness;
use pretty_assertions::assert_eq;
use schema_lens::catalog::{sample_catalog, write_snapshot};
use schema_lens::config::Config;
use schema_lens::options::Destination;
use schema_lens::session::Session;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a snapshot and a config file naming it; returns both paths.
fn write_config(dir: &TempDir) -> (PathBuf, PathBuf) {
    let snapshot = dir.path().join("books.json");
    write_snapshot(&sample_catalog(), &snapshot).unwrap();

    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        format!(
            r#"
[log]
level = "info"

[defaults]
include-tables = ".*BOOKS"
table-types = ["TABLE", "VIEW"]
format = "json"
no-info = true

[connections.books]
server = "offline"
database = "{}"
"#,
            snapshot.display()
        ),
    )
    .unwrap();
    (snapshot, config)
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_config_defaults_do_not_override_explicit_fragments() {
    let dir = tempfile::tempdir().unwrap();
    let (_, config) = write_config(&dir);
    let mut harness = Harness::new();

    harness
        .run_all(&[
            "limit include-tables=.*AUTHORS",
            &format!("config-file {}", config.display()),
        ])
        .await;

    let options = harness.session.current_options();
    assert!(options.limit().tables().test("PUBLIC.BOOKS.AUTHORS"));
    assert!(!options.limit().tables().test("PUBLIC.BOOKS.BOOKS"));
    assert_eq!(
        options.limit().table_types().to_vec(),
        vec!["TABLE".to_string(), "VIEW".to_string()]
    );
    assert_eq!(harness.session.config_path(), Some(config.as_path()));

    // sweep falls back to the config defaults, not the built-in ones
    harness.run("sweep").await.unwrap();
    let options = harness.session.current_options();
    assert!(options.limit().tables().test("PUBLIC.BOOKS.BOOKS"));
    assert!(!options.limit().tables().test("PUBLIC.BOOKS.AUTHORS"));
}

#[tokio::test]
async fn test_named_connection_and_output_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (_, config) = write_config(&dir);
    let report = dir.path().join("report.json");
    let mut harness = Harness::new();

    harness
        .run_all(&[
            &format!("config-file path={}", config.display()),
            "connect books",
            &format!("execute output-file={}", report.display()),
        ])
        .await;

    let document: serde_json::Value = serde_json::from_str(&read(&report)).unwrap();
    assert!(document.get("crawl_info").is_none());
    let names: Vec<&str> = document["tables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["BOOKS"]);
}

#[tokio::test]
async fn test_config_defaults_do_not_override_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.json");
    let config = dir.path().join("text.toml");
    std::fs::write(&config, "[defaults]\nformat = \"text\"\ntitle = \"Catalog\"\n").unwrap();
    let mut harness = Harness::new();

    harness
        .run_all(&[
            "connect server=mock",
            &format!("execute format=json output-file={}", report.display()),
            &format!("config-file {}", config.display()),
        ])
        .await;

    let output = harness.session.output_options();
    assert_eq!(output.format(), "json");
    assert_eq!(output.destination(), &Destination::File(report.clone()));
    assert_eq!(output.title(), Some("Catalog"));

    std::fs::remove_file(&report).unwrap();
    harness.run("execute").await.unwrap();
    let document: serde_json::Value = serde_json::from_str(&read(&report)).unwrap();
    assert!(document["tables"].is_array());
}

#[tokio::test]
async fn test_missing_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut harness = Harness::new();

    let err = harness
        .run(&format!("config-file {}", dir.path().join("nope.toml").display()))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Configuration Error");
    assert_eq!(harness.session.config_path(), None);
}

#[tokio::test]
async fn test_unknown_default_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[defaults]\ninclude-everything = true\n").unwrap();
    let mut harness = Harness::new();

    let err = harness
        .run(&format!("config-file {}", path.display()))
        .await
        .unwrap_err();
    assert_eq!(err.category(), "Option Validation Error");
}

#[test]
fn test_session_from_config_takes_log_level() {
    let dir = tempfile::tempdir().unwrap();
    let (_, config_path) = write_config(&dir);
    let config = Config::load_from_file(&config_path).unwrap();

    let session = Session::from_config(&config, Some(config_path.as_path())).unwrap();
    assert_eq!(session.log_level(), "info");
    assert_eq!(session.output_options().format(), "json");
    assert!(session.named_connection("books").is_some());
}
