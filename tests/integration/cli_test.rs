//! End-to-end tests of the compiled binary.
//!
//! Every run points `--config` at a scratch file so the user's own config
//! file is never read.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn run_cli(args: &[&str], config: &str, stdin: &str) -> Output {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(&config_path, config).unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_sales-reports"))
        .arg("--config")
        .arg(&config_path)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_list_prints_catalog() {
    let output = run_cli(&["--list"], "", "");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 15);
    assert_eq!(stdout.lines().next(), Some("1. Active Users"));
}

#[test]
fn test_list_includes_custom_reports() {
    let config = r#"
[[reports]]
id = "16"
title = "Inactive Products"
sql = "SELECT nome FROM produto WHERE ativo = false"
"#;
    let output = run_cli(&["--list"], config, "");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().last(), Some("16. Inactive Products"));
}

#[test]
fn test_single_report_with_mock_db() {
    let output = run_cli(&["--mock-db", "-r", "3"], "", "");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("3. Order Count by Status\n"));
    assert!(stdout.contains("result\n------\nmock  \n"));
    assert!(stdout.ends_with("Total: 1 record(s)\n"));
}

#[test]
fn test_unknown_report_exits_with_failure() {
    let output = run_cli(&["--mock-db", "-r", "99"], "", "");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Unknown report '99'"));
}

#[test]
fn test_interactive_menu_reads_stdin() {
    let output = run_cli(&["--mock-db"], "", "1\n\n0\n");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Sales Reports CLI\n"));
    assert!(stdout.contains("1. Active Users\n=============="));
    assert_eq!(stdout.matches("Choose an option: ").count(), 2);
}

#[test]
fn test_invalid_config_exits_with_failure() {
    let output = run_cli(&["--list"], "[[reports]]\nid = \"1\"\n", "");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Configuration"));
}

#[test]
fn test_connection_notices_on_stderr() {
    let Some(url) = std::env::var("DATABASE_URL").ok() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let output = run_cli(&[url.as_str(), "-r", "3"], "", "");

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert!(lines.first().is_some_and(|l| l.starts_with("Connected to ")));
    assert_eq!(lines.last(), Some(&"Connection closed."));
    // A failed report (e.g. missing tables) yields the diagnostic line only.
    assert!(!stderr.contains("Query failed"));
}
