//! Shell and binary tests: batch runs and exit codes.

use schema_lens::catalog::{default_connectors, MockConnector, MockCrawler};
use schema_lens::commands::CommandDispatcher;
use schema_lens::formatters::{FormatterRegistry, DOCUMENT_START};
use schema_lens::logging::LogHandle;
use schema_lens::session::Session;
use schema_lens::shell::Shell;
use std::process::Command;
use std::sync::Arc;

fn schemalens(dir: &tempfile::TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_schemalens"));
    command
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .env_remove("RUST_LOG")
        .env_remove("SCHEMALENS_LOG");
    command
}

#[tokio::test]
async fn test_batch_run_writes_report_to_stdout() {
    let crawler = Arc::new(MockCrawler::new());
    let dispatcher = CommandDispatcher::new(
        default_connectors(false).register(Arc::new(MockConnector::with_crawler(crawler.clone()))),
        FormatterRegistry::default(),
        LogHandle::detached(),
    );
    let mut shell = Shell::new(dispatcher, Session::new());
    let (mut out, mut err) = (Vec::new(), Vec::new());

    shell
        .run_batch(
            ["# comment", "", "connect server=mock", "log", "exit"],
            &mut out,
            &mut err,
        )
        .await
        .unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Connected to mock catalog"));
    assert!(out.contains("Log level: warn"));
    assert!(err.is_empty());
    assert!(crawler.is_closed());
}

#[test]
fn test_cli_one_shot_success() {
    let dir = tempfile::tempdir().unwrap();
    let output = schemalens(&dir)
        .args(["--mock-db", "-c", "connect server=mock", "-c", "execute text"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Connected to mock catalog"));
    assert!(stdout.contains(DOCUMENT_START));
    assert!(stdout.contains("PUBLIC.BOOKS.BOOKS"));
}

#[test]
fn test_cli_precondition_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let output = schemalens(&dir).args(["-c", "execute"]).output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("execute: Precondition error: execute: not connected"));
}

#[test]
fn test_cli_mock_server_needs_flag() {
    let dir = tempfile::tempdir().unwrap();
    let output = schemalens(&dir)
        .args(["-c", "connect server=mock"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("books.lens");
    let report = dir.path().join("report.dot");
    std::fs::write(
        &script,
        format!(
            "# document the books schema\nconnect server=mock\nlimit include-schemas=PUBLIC.BOOKS\nexecute dot output-file={}\nexit\n",
            report.display()
        ),
    )
    .unwrap();

    let output = schemalens(&dir)
        .arg("--mock-db")
        .arg("--script")
        .arg(&script)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let dot = std::fs::read_to_string(&report).unwrap();
    assert!(dot.contains("PUBLIC.BOOKS.AUTHORS"));
    assert!(!dot.contains("PUBLISHER_SALES"));
}
