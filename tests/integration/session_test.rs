//! Session state machine tests.

use super::common::Harness;
use pretty_assertions::assert_eq;
use schema_lens::error::LensError;
use schema_lens::options::{CrawlOptions, Destination, InfoLevel};
use schema_lens::session::SessionState;
use std::path::PathBuf;

#[tokio::test]
async fn test_execute_without_connect_fails() {
    let mut harness = Harness::new();
    let before = harness.session.current_options().clone();

    let err = harness.run("execute format=text").await.unwrap_err();

    assert!(
        matches!(err, LensError::Precondition { ref reason, .. } if reason == "not connected"),
        "unexpected error: {err}"
    );
    assert_eq!(harness.session.current_options(), &before);
    assert_eq!(harness.session.state(), SessionState::Disconnected);
    assert_eq!(harness.crawler.crawl_count(), 0);
}

#[tokio::test]
async fn test_rejected_commands_leave_options_unchanged() {
    let mut harness = Harness::new();
    harness.run_all(&["limit include-tables=.*BOOKS"]).await;
    let before = harness.session.current_options().clone();

    assert!(harness.run("limit include-tables=(BOOKS").await.is_err());
    assert!(harness.run("grep only-matching=perhaps").await.is_err());
    assert!(harness.run("disconnect").await.is_err());

    assert_eq!(harness.session.current_options(), &before);
}

#[tokio::test]
async fn test_sweep_resets_fragments_and_keeps_connection() {
    let mut harness = Harness::new();
    harness
        .run_all(&[
            "connect server=mock",
            "limit include-tables=.*BOOKS include-sequences=.*",
            "grep include-grepped-columns=.*ID --only-matching",
            "load info-level=maximum --load-row-counts",
            "filter parents=1",
        ])
        .await;
    assert_ne!(harness.session.current_options(), &CrawlOptions::default());

    // Execute to a file so the output options differ from the defaults.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");
    harness
        .run(&format!("execute text output-file={}", path.display()))
        .await
        .unwrap();
    let output = harness.session.output_options().clone();

    harness.run("sweep").await.unwrap();

    assert_eq!(harness.session.current_options(), &CrawlOptions::default());
    assert!(harness.session.is_connected());
    assert_eq!(harness.session.output_options(), &output);
    assert_eq!(
        harness.session.output_options().destination(),
        &Destination::File(PathBuf::from(&path))
    );
}

#[tokio::test]
async fn test_grep_discarded_by_sweep_before_execute() {
    let mut harness = Harness::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");

    harness
        .run_all(&[
            "grep includeGreppedColumns=.*REGIONS.* onlyMatching=true",
            "sweep",
            "connect server=mock",
            &format!("execute output-file={}", path.display()),
        ])
        .await;

    let options = harness.crawler.last_options().unwrap();
    assert_eq!(options.grep(), CrawlOptions::default().grep());
    assert!(!options.grep().only_matching());
}

#[tokio::test]
async fn test_later_fragments_replace_whole_fields() {
    let mut harness = Harness::new();
    harness
        .run_all(&[
            "limit include-tables=.*BOOKS table-types=TABLE",
            "limit include-tables=.*AUTHORS",
            "load info-level=minimum",
            "load --weak-associations",
        ])
        .await;

    let options = harness.session.current_options();
    assert!(options.limit().tables().test("PUBLIC.BOOKS.AUTHORS"));
    assert!(!options.limit().tables().test("PUBLIC.BOOKS.BOOKS"));
    // fields absent from the second limit keep the first limit's value
    assert_eq!(options.limit().table_types().to_vec(), vec!["TABLE".to_string()]);
    assert_eq!(options.load().info_level(), InfoLevel::Minimum);
    assert!(options.load().weak_associations());
}

#[tokio::test]
async fn test_connect_disconnect_cycle() {
    let mut harness = Harness::new();

    harness.run("connect server=mock").await.unwrap();
    assert_eq!(harness.session.state(), SessionState::Connected);

    let err = harness.run("connect server=mock").await.unwrap_err();
    assert_eq!(err.category(), "Precondition Error");

    harness.run("disconnect").await.unwrap();
    assert_eq!(harness.session.state(), SessionState::Disconnected);
    assert!(harness.crawler.is_closed());

    harness.run("connect mock://").await.unwrap();
    assert!(harness.session.is_connected());
}

#[tokio::test]
async fn test_failed_connect_stays_disconnected() {
    let mut harness = Harness::new();

    let err = harness
        .run("connect server=offline database=/definitely/not/here.json")
        .await
        .unwrap_err();

    assert_eq!(err.category(), "Connection Error");
    assert!(!harness.session.is_connected());
}
