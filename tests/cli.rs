//! Command-line tests for the gplot binary.

mod common;

use assert_cmd::prelude::*;
use common::fields;
use predicates::prelude::*;
use std::process::Command;

fn gplot() -> Command {
    let mut cmd = Command::cargo_bin("gplot").unwrap();
    cmd.env_remove("GPLOT_CONFIG").env_remove("GPLOT_LOG_LEVEL");
    cmd
}

#[test]
fn cli_shows_help() {
    gplot()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("gplot"));
}

#[test]
fn cli_prints_levels() {
    gplot()
        .args(["levels", "0", "100", "--num", "10"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0\n10\n20\n"))
        .stdout(predicate::str::contains("\n100\n"));
}

#[test]
fn cli_levels_with_negative_bound() {
    gplot()
        .args(["levels", "-3", "5", "--zero", "must"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n0\n"));
}

#[test]
fn cli_lists_tables() {
    gplot()
        .arg("tables")
        .assert()
        .success()
        .stdout(predicate::str::contains("temp"))
        .stdout(predicate::str::contains("rh"));

    gplot()
        .args(["tables", "pre_level"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# "));

    gplot().args(["tables", "no_such_table"]).assert().failure();
}

#[test]
fn cli_renders_json_field() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("anomaly.json");
    let output = dir.path().join("anomaly.png");
    fields::write_json_field(&input, &fields::anomaly_field(30, 40), None, None, "K").unwrap();

    gplot()
        .args(["--log-level", "warn", "render"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--plain", "--title", "Anomaly", "--width", "400", "--height", "300"])
        .assert()
        .success();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn cli_rejects_conflicting_table_and_cmap() {
    gplot()
        .args(["render", "in.json", "-o", "out.png", "--table", "temp", "--cmap", "viridis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn cli_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    gplot()
        .arg("render")
        .arg(dir.path().join("missing.json"))
        .arg("-o")
        .arg(dir.path().join("out.png"))
        .arg("--plain")
        .assert()
        .failure();
}
