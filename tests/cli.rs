use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const STATEMENT: &str = "\
Date,Description,Credit,Debit
2024-01-05,Coffee Shop,,4.50
N/A,Pending authorization,,9.99
2024-01-07,Payroll ACME INC,\"$2,500.00\",
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn tally(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_detect_json_prints_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "stmt.csv", STATEMENT);
    let output = tally(dir.path())
        .args(["detect", "--json"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());
    let mapping: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(mapping["date"], "Date");
    assert_eq!(mapping["credit"], "Credit");
    assert_eq!(mapping["debit"], "Debit");
    assert_eq!(mapping["description"], "Description");
    assert!(mapping.get("category").is_none());
}

#[test]
fn test_detect_table_lists_roles() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "stmt.csv", STATEMENT);
    tally(dir.path())
        .arg("detect")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("description"))
        .stdout(predicate::str::contains("3 rows"));
}

#[test]
fn test_parse_json_drops_undated_rows() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "stmt.csv", STATEMENT);
    let output = tally(dir.path())
        .args(["parse", "--format", "json"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["description"], "Coffee Shop");
    assert_eq!(records[0]["credit"], serde_json::Value::Null);
    assert_eq!(records[0]["debit"], 4.5);
    assert_eq!(records[0]["amount"], -4.5);
    assert_eq!(records[1]["credit"], 2500.0);
}

#[test]
fn test_parse_summary_goes_to_stderr_for_json() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "stmt.csv", STATEMENT);
    tally(dir.path())
        .args(["parse", "--format", "json", "--summary"])
        .arg(&csv)
        .assert()
        .success()
        .stderr(predicate::str::contains("3 rows read, 2 transactions"))
        .stderr(predicate::str::contains("1 rows dropped"));
}

#[test]
fn test_parse_map_override_sets_category() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(
        dir.path(),
        "stmt.csv",
        "Date,Memo,Type,Amount\n2024-01-05,Coffee,Food,4.50\n",
    );
    let output = tally(dir.path())
        .args(["parse", "--format", "json", "--map", "category=Type", "--map", "debit=Amount"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records[0]["category"], "Food");
    assert_eq!(records[0]["debit"], 4.5);
    assert_eq!(records[0]["credit"], serde_json::Value::Null);
}

#[test]
fn test_parse_with_mapping_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(
        dir.path(),
        "stmt.csv",
        "Posted,Narrative,Value\n01/15/2025,Refund,12.00\n",
    );
    let mapping = write(
        dir.path(),
        "mapping.json",
        r#"{"date": "Posted", "debit": "Value", "description": "Narrative"}"#,
    );
    tally(dir.path())
        .args(["parse", "--format", "csv", "--mapping"])
        .arg(&mapping)
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("date,description,credit,debit,amount,category"))
        .stdout(predicate::str::contains("Refund,,12.0,-12.0,"));
}

#[test]
fn test_parse_unknown_mapped_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "stmt.csv", STATEMENT);
    tally(dir.path())
        .args(["parse", "--map", "category=Kind"])
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Kind"));
}

#[test]
fn test_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    tally(dir.path())
        .args(["parse"])
        .arg(dir.path().join("absent.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_config_init_writes_defaults_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf").join("settings.json");
    tally(dir.path())
        .args(["config", "--init", "--config"])
        .arg(&path)
        .assert()
        .success();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["fallback_description"], "Unknown");

    tally(dir.path())
        .args(["config", "--init", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_keywords_change_detection() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(
        dir.path(),
        "settings.json",
        r#"{"credit_keywords": ["paid in"], "debit_keywords": ["paid out"]}"#,
    );
    let csv = write(
        dir.path(),
        "stmt.csv",
        "Date,Details,Balance,Paid Out,Paid In\n\
         2024-01-05,Coffee,95.50,4.50,\n\
         2024-01-06,Salary,1095.50,,1000.00\n",
    );
    let output = tally(dir.path())
        .args(["detect", "--json", "--config"])
        .arg(&config)
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());
    let mapping: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(mapping["credit"], "Paid In");
    assert_eq!(mapping["debit"], "Paid Out");
}
