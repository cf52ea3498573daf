//! Smoke tests for the binary surface. Nothing here talks to an Ollama
//! server; only commands that stay local are exercised.

use assert_cmd::Command;
use tempfile::TempDir;

#[test]
fn help_exits_zero() {
    Command::cargo_bin("docrag")
        .unwrap()
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn list_on_a_fresh_directory_reports_nothing_indexed() {
    let docs = TempDir::new().unwrap();
    let output = Command::cargo_bin("docrag")
        .unwrap()
        .args(["--dir", docs.path().to_str().unwrap(), "list"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No documents have been indexed"));
}

#[test]
fn index_on_an_empty_directory_is_a_noop() {
    let docs = TempDir::new().unwrap();
    let output = Command::cargo_bin("docrag")
        .unwrap()
        .args(["--dir", docs.path().to_str().unwrap(), "index"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No changes detected"));
}

#[test]
fn missing_documents_directory_is_a_fatal_error() {
    Command::cargo_bin("docrag")
        .unwrap()
        .args(["--dir", "/nonexistent/docs", "list"])
        .assert()
        .failure();
}
