use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const STATEMENT: &str = "\
Everyday Account,,,
Exported 2024-01-05,,,
Date,Description,Amount,Balance
02/01/2024,AMAZON MKTPLACE PMTS 55512,-25.00,975.00
31/12/2023,COFFEE SHOP,-3.50,1000.00
31/02/2024,MYSTERY,-1.00,999.00
";

const HISTORY: &str = "\
Date,Details / [To],Category,Notes,Amount
01/12/2023,Amazon,Shopping,AMAZON MKTPLACE PMTS,-10
";

fn ledgerline(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ledgerline").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_columns_shows_detected_header() {
    let home = tempfile::tempdir().unwrap();
    let stmt = home.path().join("stmt.csv");
    std::fs::write(&stmt, STATEMENT).unwrap();

    ledgerline(home.path())
        .args(["columns", stmt.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Header found on row 3"))
        .stdout(predicate::str::contains("Description"))
        .stdout(predicate::str::contains("COFFEE SHOP"));
}

#[test]
fn test_columns_counts_leading_empty_lines() {
    let home = tempfile::tempdir().unwrap();
    let stmt = home.path().join("stmt.csv");
    std::fs::write(&stmt, "\n\n\nDate,Description,Amount\n01/03/2024,SHOP,-1\n").unwrap();

    ledgerline(home.path())
        .args(["columns", stmt.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Header found on row 4"));
}

#[test]
fn test_convert_writes_ledger() {
    let home = tempfile::tempdir().unwrap();
    let stmt = home.path().join("stmt.csv");
    let hist = home.path().join("history.csv");
    let out = home.path().join("ledger.csv");
    std::fs::write(&stmt, STATEMENT).unwrap();
    std::fs::write(&hist, HISTORY).unwrap();

    ledgerline(home.path())
        .args([
            "convert",
            stmt.to_str().unwrap(),
            "--account",
            "Everyday",
            "--date",
            "Date",
            "--description",
            "Description",
            "--amount",
            "Amount",
            "--history",
            hist.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 transactions written"))
        .stdout(predicate::str::contains("Skipped 0 blank rows"))
        .stdout(predicate::str::contains("1 suggestions from 1 history records"))
        .stdout(predicate::str::contains("1 unreadable dates"));

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "Everyday,31/12/2023,,,COFFEE SHOP,,-3.5,Y\n\
         Everyday,02/01/2024,Amazon,Shopping,AMAZON MKTPLACE PMTS 55512,,-25,Y\n\
         Everyday,,,,MYSTERY,,-1,Y\n"
    );
}

#[test]
fn test_convert_defaults_output_into_configured_dir() {
    let home = tempfile::tempdir().unwrap();
    let stmt = home.path().join("march.csv");
    let out_dir = home.path().join("ledgers");
    std::fs::write(&stmt, STATEMENT).unwrap();

    ledgerline(home.path())
        .args(["config", "--output-dir", out_dir.to_str().unwrap()])
        .assert()
        .success();

    ledgerline(home.path())
        .args([
            "convert",
            stmt.to_str().unwrap(),
            "--account",
            "Everyday",
            "--date",
            "Date",
            "--description",
            "Description",
            "--amount",
            "Amount",
            "--reconciled",
            "N",
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(out_dir.join("march-ledger.csv")).unwrap();
    assert!(written.lines().all(|l| l.ends_with(",N")));
}

#[test]
fn test_convert_unknown_column_fails() {
    let home = tempfile::tempdir().unwrap();
    let stmt = home.path().join("stmt.csv");
    let out = home.path().join("ledger.csv");
    std::fs::write(&stmt, STATEMENT).unwrap();

    ledgerline(home.path())
        .args([
            "convert",
            stmt.to_str().unwrap(),
            "--account",
            "Everyday",
            "--date",
            "Posted",
            "--description",
            "Description",
            "--amount",
            "Amount",
            "--output",
            out.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column not found: 'Posted'"));
    assert!(!out.exists());
}

#[test]
fn test_unsupported_extension_fails() {
    let home = tempfile::tempdir().unwrap();
    let stmt = home.path().join("stmt.txt");
    std::fs::write(&stmt, STATEMENT).unwrap();

    ledgerline(home.path())
        .args(["columns", stmt.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn test_config_rejects_bad_threshold() {
    let home = tempfile::tempdir().unwrap();
    ledgerline(home.path())
        .args(["config", "--threshold", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("match_threshold"));
}

#[test]
fn test_config_shows_defaults() {
    let home = tempfile::tempdir().unwrap();
    ledgerline(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Match threshold:  0.3"))
        .stdout(predicate::str::contains("Date order:       day_first"));
}
