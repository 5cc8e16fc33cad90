// this_file: pathmin/tests/cli.rs

//! Smoke tests for the pathmin binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_string_input_to_stdout() {
    Command::cargo_bin("pathmin")
        .unwrap()
        .args(["-s", r#"<svg><path d="M 10,10 L 20,20"/></svg>"#])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"d="M10 10l10 10""#));
}

#[test]
fn test_stdin_to_stdout() {
    Command::cargo_bin("pathmin")
        .unwrap()
        .arg("-")
        .write_stdin(r#"<svg><path d="M0 0 h5 h10"/></svg>"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"d="M0 0h15""#));
}

#[test]
fn test_file_input_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.svg");
    let output = dir.path().join("out.svg");
    std::fs::write(&input, r#"<svg><path d="M0 0 L50 0 L50 50 L0 50 L0 0"/></svg>"#).unwrap();

    Command::cargo_bin("pathmin")
        .unwrap()
        .arg(input.to_str().unwrap())
        .args(["-o", output.to_str().unwrap(), "--quiet"])
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains(r#"d="M0 0h50v50H0z""#), "got {written}");
}

#[test]
fn test_precision_override() {
    Command::cargo_bin("pathmin")
        .unwrap()
        .args(["-s", r#"<svg><path d="M0 0 L1.23456 0"/></svg>"#, "-p", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"d="M0 0h1.23""#));
}

#[test]
fn test_datauri_output() {
    Command::cargo_bin("pathmin")
        .unwrap()
        .args(["-s", "<svg/>", "--datauri", "base64"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("data:image/svg+xml;base64,"));
}

#[test]
fn test_invalid_input_fails() {
    Command::cargo_bin("pathmin")
        .unwrap()
        .args(["-s", "<svg><path></svg>"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pathmin:"));
}
