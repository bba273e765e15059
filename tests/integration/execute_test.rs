//! Execute tests: format resolution, crawling and report output.

use super::common::Harness;
use pretty_assertions::assert_eq;
use schema_lens::catalog::{sample_catalog, write_snapshot};
use schema_lens::commands::CommandOutput;
use schema_lens::error::LensError;
use schema_lens::formatters::{DOCUMENT_END, DOCUMENT_START};
use schema_lens::options::Destination;
use std::path::Path;

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn table_names(document: &serde_json::Value) -> Vec<String> {
    document["tables"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_text_report_has_markers_and_system_information() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    harness.run("connect server=mock").await.unwrap();
    let output = harness
        .run(&format!("execute format=text output-file={}", path.display()))
        .await
        .unwrap();

    assert_eq!(
        output,
        CommandOutput::info(format!("Wrote text report to {}", path.display()))
    );
    let text = read(&path);
    assert!(text.starts_with(DOCUMENT_START));
    assert!(text.contains("System Information"));
    assert!(text.contains("PUBLIC.BOOKS.AUTHORS  [table]"));
    assert!(text.trim_end().ends_with(DOCUMENT_END));
}

#[tokio::test]
async fn test_no_info_drops_system_information() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    harness.run("connect server=mock").await.unwrap();
    harness
        .run(&format!("execute text --no-info output-file={}", path.display()))
        .await
        .unwrap();

    let text = read(&path);
    assert!(text.starts_with(DOCUMENT_START));
    assert!(!text.contains("System Information"));
}

#[tokio::test]
async fn test_limit_before_connect_narrows_tables() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    harness
        .run_all(&[
            "limit includeTables=.*BOOKS",
            "connect server=mock",
            &format!("execute json output-file={}", path.display()),
        ])
        .await;

    let options = harness.crawler.last_options().unwrap();
    assert_eq!(&options, harness.session.current_options());

    let document: serde_json::Value = serde_json::from_str(&read(&path)).unwrap();
    assert_eq!(table_names(&document), vec!["BOOKS".to_string()]);
}

#[tokio::test]
async fn test_unsupported_format_fails_before_crawl() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");

    harness.run("connect server=mock").await.unwrap();
    let err = harness
        .run(&format!("execute format=pdf output-file={}", path.display()))
        .await
        .unwrap_err();

    assert!(matches!(err, LensError::UnsupportedFormat(ref f) if f == "pdf"));
    assert_eq!(harness.crawler.crawl_count(), 0);
    assert!(!path.exists());
    assert_eq!(harness.session.output_options().format(), "text");
}

#[tokio::test]
async fn test_unwritable_destination_is_sink_error() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.txt");

    harness.run("connect server=mock").await.unwrap();
    let err = harness
        .run(&format!("execute output-file={}", path.display()))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Sink Write Error");
    assert_eq!(err.exit_code(), 5);
    assert_eq!(harness.session.output_options().destination(), &Destination::Stdout);
}

#[tokio::test]
async fn test_output_is_byte_identical_across_runs() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();

    harness
        .run_all(&["connect server=mock", "load info-level=maximum --load-row-counts"])
        .await;

    for format in ["text", "json", "dot", "lint"] {
        let first = dir.path().join(format!("first.{format}"));
        let second = dir.path().join(format!("second.{format}"));
        harness
            .run(&format!("execute {format} --show-columns output-file={}", first.display()))
            .await
            .unwrap();
        harness
            .run(&format!("execute {format} --show-columns output-file={}", second.display()))
            .await
            .unwrap();
        assert_eq!(read(&first), read(&second), "{format} output differs");
    }
}

#[tokio::test]
async fn test_format_aliases_and_persisted_output_options() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diagram.dot");

    harness.run("connect server=mock").await.unwrap();
    harness
        .run(&format!("execute diagram title=Books output-file={}", path.display()))
        .await
        .unwrap();

    let dot = read(&path);
    assert!(dot.starts_with("digraph \"catalog\" {"));
    assert!(dot.contains("\"PUBLIC.BOOKS.BOOKAUTHORS\" -> \"PUBLIC.BOOKS.BOOKS\""));
    assert!(dot.trim_end().ends_with('}'));

    // A bare execute reuses the previous format, title and destination.
    std::fs::remove_file(&path).unwrap();
    harness.run("execute").await.unwrap();
    assert!(read(&path).starts_with("digraph"));
    assert_eq!(harness.session.output_options().title(), Some("Books"));
}

#[tokio::test]
async fn test_lint_report() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lint.json");

    harness.run("connect server=mock").await.unwrap();
    harness
        .run(&format!("execute lint-json output-file={}", path.display()))
        .await
        .unwrap();

    let report: serde_json::Value = serde_json::from_str(&read(&path)).unwrap();
    assert_eq!(report["summary"]["tables_checked"], 7);

    let book_authors = report["tables"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["table"] == "PUBLIC.BOOKS.BOOKAUTHORS")
        .unwrap();
    let ids: Vec<&str> = book_authors["lints"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"no-primary-key"));
}

#[tokio::test]
async fn test_offline_snapshot_end_to_end() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("books.json");
    let report = dir.path().join("report.json");
    write_snapshot(&sample_catalog(), &snapshot).unwrap();

    harness
        .run_all(&[
            &format!("connect offline://{}", snapshot.display()),
            "limit include-schemas=PUBLIC.PUBLISHER_SALES",
            &format!("execute json --no-info output-file={}", report.display()),
        ])
        .await;

    let document: serde_json::Value = serde_json::from_str(&read(&report)).unwrap();
    assert!(document.get("crawl_info").is_none());
    assert_eq!(
        table_names(&document),
        vec!["REGIONS".to_string(), "SALES".to_string()]
    );
    // the mock crawler was never used
    assert_eq!(harness.crawler.crawl_count(), 0);
}
