use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const TABLE_REQUEST: &str = r#"{
    "email_id": 101,
    "subject": "GeNS Transaction Alert",
    "from_email": "gens@gtbank.com",
    "html_body": "<table><tr><td>Amount</td><td>NGN 1,000.00</td></tr><tr><td>Description</td><td>TRF FROM JOHN DOE TO ME</td></tr></table>"
}"#;

fn payex() -> Command {
    Command::cargo_bin("payex").unwrap()
}

#[test]
fn test_extract_from_stdin() {
    payex()
        .arg("extract")
        .write_stdin(TABLE_REQUEST)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""success":true"#))
        .stdout(predicate::str::contains(r#""amount":1000.0"#))
        .stdout(predicate::str::contains(r#""source":"html_table""#))
        .stdout(predicate::str::contains(r#""sender_name":"john doe""#));
}

#[test]
fn test_extract_text_file_as_text() {
    let dir = tempdir().unwrap();
    let body = dir.path().join("body.txt");
    fs::write(&body, "Your account was credited. Amount: NGN 7,500.00").unwrap();

    payex()
        .args(["extract", "--format", "text", "--text-file"])
        .arg(&body)
        .assert()
        .success()
        .stdout(predicate::str::contains("Amount: 7500.00 NGN"))
        .stdout(predicate::str::contains("Source: text_body (confidence 0.80)"));
}

#[test]
fn test_no_match_exits_zero() {
    payex()
        .arg("extract")
        .write_stdin(r#"{"email_id": 1, "text_body": "Hello, how are you?"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("All extraction strategies failed"));
}

#[test]
fn test_invalid_request_exits_nonzero() {
    payex()
        .arg("extract")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Extraction exception:"));
}

#[test]
fn test_extract_help_documents_size_limit() {
    payex()
        .args(["extract", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("extraction.max_body_bytes"));
}

#[test]
fn test_batch_summary() {
    let dir = tempdir().unwrap();
    let input_dir = dir.path().join("requests");
    let output_dir = dir.path().join("out");
    fs::create_dir_all(&input_dir).unwrap();

    fs::write(input_dir.join("a.json"), TABLE_REQUEST).unwrap();
    fs::write(
        input_dir.join("b.json"),
        r#"{"email_id": "b-2", "text_body": "nothing to see"}"#,
    )
    .unwrap();
    fs::write(input_dir.join("c.json"), "{broken").unwrap();

    payex()
        .args(["batch", "--summary", "--continue-on-error", "--jobs", "2", "--output-dir"])
        .arg(&output_dir)
        .arg(format!("{}/*.json", input_dir.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"));

    let summary = fs::read_to_string(output_dir.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(
        lines[0],
        "file,email_id,status,amount,currency,confidence,source,sender,errors,extracted_at"
    );
    assert!(lines[1].starts_with("a.json,101,success,1000,NGN,0.95,html_table,john doe,,"));
    assert!(lines[2].starts_with("b.json,b-2,no_match,,,,,,All extraction strategies failed,"));
    assert!(lines[3].starts_with("c.json,,error,"));

    assert!(output_dir.join("a.json").exists());
    assert!(output_dir.join("b.json").exists());
    assert!(!output_dir.join("c.json").exists());
}

#[test]
fn test_batch_stops_on_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.json"), "{broken").unwrap();

    payex()
        .arg("batch")
        .arg(format!("{}/*.json", dir.path().display()))
        .assert()
        .failure();
}

#[test]
fn test_config_set_and_get() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    payex()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "set", "extraction.default_currency", "USD"])
        .assert()
        .success();

    payex()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "get", "extraction.default_currency"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"USD\""));

    payex()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure();
}
