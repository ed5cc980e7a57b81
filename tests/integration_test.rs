//! Integration tests for the payout splitter CLI.
//!
//! These tests run the actual binary against request files and check the
//! CSV report and exit status.

use assert_cmd::Command;
use predicates::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str =
    "batch_id,external_id,destination,amount,confirmation_id,currency,transaction_type,timestamp";

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Write a request file to a temporary location
fn request_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Run the binary with the given arguments and return stdout
fn run_splitter(args: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    let assert = cmd.args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Report rows split into columns, header skipped
fn rows(report: &str) -> Vec<Vec<String>> {
    report
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.split(',').map(|s| s.to_string()).collect())
        .collect()
}

/// Amounts per batch id, in report order
fn amounts_by_batch(report: &str) -> Vec<Vec<String>> {
    let mut order = Vec::new();
    let mut by_batch: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in rows(report) {
        if !by_batch.contains_key(&row[0]) {
            order.push(row[0].clone());
        }
        by_batch.entry(row[0].clone()).or_default().push(row[3].clone());
    }
    order.into_iter().map(|id| by_batch[&id].clone()).collect()
}

fn cents(amount: &str) -> i64 {
    let (whole, frac) = amount.split_once('.').unwrap();
    assert_eq!(frac.len(), 2, "Expected 2 decimal places in: {}", amount);
    whole.parse::<i64>().unwrap() * 100 + frac.parse::<i64>().unwrap()
}

#[test]
fn test_equal_capped_requests() {
    let output = run_splitter(&[&test_data_path("requests_equal.csv")]);

    assert!(output.starts_with(HEADER));
    assert_eq!(
        amounts_by_batch(&output),
        vec![
            vec!["14999.99".to_string()],
            vec!["10000.00".to_string(), "10000.00".to_string()],
            vec![
                "10000.00".to_string(),
                "10000.00".to_string(),
                "10000.01".to_string()
            ],
        ]
    );
}

#[test]
fn test_mixed_strategies_reconcile() {
    let output = run_splitter(&[&test_data_path("requests_mixed.csv")]);
    let batches = amounts_by_batch(&output);
    assert_eq!(batches.len(), 4);

    let expected_totals = [100_000, 500_000, 4_500_000, 10_000];
    for (amounts, expected) in batches.iter().zip(expected_totals) {
        let sum: i64 = amounts.iter().map(|a| cents(a)).sum();
        assert!((sum - expected).abs() <= 2, "sum {} != {}", sum, expected);
        for a in amounts {
            let c = cents(a);
            assert!(c > 0 && c <= 1_499_999, "amount {} out of range", a);
        }
    }

    assert_eq!(batches[0].len(), 5);
    assert!((3..=10).contains(&batches[1].len()));
    assert!((4..=14).contains(&batches[2].len()));
    assert_eq!(batches[3].len(), 7);

    for row in rows(&output) {
        assert!(row[2].ends_with("@pix"));
        assert!(!row[2].starts_with(' '));
        assert_eq!(row[5], "BRL");
        assert_eq!(row[6], "PIX_CASH_OUT");
        let confirmation: u32 = row[4].parse().unwrap();
        assert!((100_000..=999_999).contains(&confirmation));
    }
}

#[test]
fn test_seeded_config_is_reproducible() {
    let requests = test_data_path("requests_mixed.csv");
    let config = test_data_path("seeded.toml");

    let first = run_splitter(&[&requests, &config]);
    let second = run_splitter(&[&requests, &config]);

    assert_eq!(amounts_by_batch(&first), amounts_by_batch(&second));
    let confirmations = |report: &str| -> Vec<String> {
        rows(report).into_iter().map(|r| r[4].clone()).collect()
    };
    assert_eq!(confirmations(&first), confirmations(&second));

    for row in rows(&first) {
        assert_eq!(row[5], "USD");
        assert_eq!(row[6], "ACH_CREDIT");
    }
}

#[test]
fn test_header_only_input() {
    let file = request_file("total,destination,method,payment_count,shuffle\n");
    let output = run_splitter(&[file.path().to_str().unwrap()]);
    assert_eq!(output.trim(), HEADER);
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.arg("nonexistent.csv")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_zero_total_exit_code() {
    let file = request_file("total,destination,method,payment_count,shuffle\n0.00,alice,1,,\n");
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.arg(file.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("greater than zero"));
}

#[test]
fn test_invalid_method_exit_code() {
    let file = request_file("total,destination,method,payment_count,shuffle\n100.00,alice,7,,\n");
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.arg(file.path())
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Use 1, 2, 3, or 4"));
}

#[test]
fn test_infeasible_split_exit_code() {
    let file =
        request_file("total,destination,method,payment_count,shuffle\n30000.00,alice,4,1,\n");
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.arg(file.path())
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Minimum 3 payments"));
}

#[test]
fn test_undecodable_row_exit_code() {
    let file = request_file("total,destination,method,payment_count,shuffle\n100.00,alice,x,,\n");
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.arg(file.path())
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("row 2"));
}

#[test]
fn test_undecodable_row_is_logged() {
    let file = request_file("total,destination,method,payment_count,shuffle\n100.00,alice,x,,\n");
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.arg(file.path())
        .env("RUST_LOG", "warn")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("WARN"))
        .stderr(predicate::str::contains("Row 2:"));
}

#[test]
fn test_bad_config_exit_codes() {
    let requests = test_data_path("requests_equal.csv");

    let mut malformed = NamedTempFile::new().unwrap();
    malformed.write_all(b"[splitter\n").unwrap();
    Command::cargo_bin("payout-splitter")
        .unwrap()
        .arg(&requests)
        .arg(malformed.path())
        .assert()
        .failure()
        .code(8);

    let mut invalid = NamedTempFile::new().unwrap();
    invalid.write_all(b"[splitter]\nceiling = \"-1\"\n").unwrap();
    Command::cargo_bin("payout-splitter")
        .unwrap()
        .arg(&requests)
        .arg(invalid.path())
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_failure_writes_no_report() {
    let file = request_file(
        "total,destination,method,payment_count,shuffle\n100.00,alice,1,,\n-1,bob,1,,\n",
    );
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.arg(file.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_infeasible_row_after_valid_row_submits_nothing() {
    let file = request_file(
        "total,destination,method,payment_count,shuffle\n20000.00,alice,1,,\n30000.00,bob,4,1,\n",
    );
    let mut cmd = Command::cargo_bin("payout-splitter").unwrap();
    cmd.arg(file.path())
        .env("RUST_LOG", "info")
        .assert()
        .code(4)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Row 3"))
        .stderr(predicate::str::contains("Processed batch").not());
}
