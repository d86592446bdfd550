//! Integration tests for the CLI interface
//!
//! Runs the binary against temporary input files and checks shards, counters,
//! and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn read_shards(dir: &Path, prefix: &str) -> (usize, Vec<String>) {
    let mut shard_count = 0;
    let mut records = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if name.starts_with(prefix) && name.ends_with(".csv") {
            shard_count += 1;
            records.extend(fs::read_to_string(&path).unwrap().lines().map(str::to_string));
        }
    }
    records.sort();
    (shard_count, records)
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--iterations"))
        .stdout(predicate::str::contains("--out-shards"));
}

#[test]
fn test_counts_keys_into_default_shards() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("rows.csv");
    fs::write(&input, "a,1\na,2\n,3\nb,4\n").unwrap();

    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("counts"))
        .assert()
        .success()
        .stdout(predicate::str::contains("rows_in: 4"))
        .stdout(predicate::str::contains("rows_bad: 0"))
        .stdout(predicate::str::contains("rows_empty_key: 1"))
        .stdout(predicate::str::contains("rows_out: 2"));

    let (shards, records) = read_shards(temp.path(), "counts-");
    assert_eq!(shards, 8);
    assert_eq!(records, vec!["a,2", "b,1"]);
    assert!(temp.path().join("counts-00000-of-00008.csv").exists());
    assert!(temp.path().join("counts-00007-of-00008.csv").exists());
}

#[test]
fn test_header_delimiter_and_key_column() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("rows.tsv");
    fs::write(&input, "id;city\n1;'Paris; FR'\n2;Oslo\n3;'Paris; FR'\n").unwrap();

    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.args(["--has-header", "--delimiter", ";", "--quotechar", "'"])
        .args(["--key-col", "1", "--out-shards", "2", "--iterations", "0"])
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("cities"))
        .assert()
        .success()
        .stdout(predicate::str::contains("rows_in: 3"));

    let (shards, records) = read_shards(temp.path(), "cities-");
    assert_eq!(shards, 2);
    assert_eq!(records, vec!["Oslo,1", "Paris; FR,2"]);
}

#[test]
fn test_out_of_bounds_key_column() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("rows.csv");
    fs::write(&input, "x\n").unwrap();

    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.args(["--key-col", "2", "--out-shards", "1"])
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("none"))
        .assert()
        .success()
        .stdout(predicate::str::contains("rows_empty_key: 1"))
        .stdout(predicate::str::contains("rows_out: 0"));

    let (shards, records) = read_shards(temp.path(), "none-");
    assert_eq!(shards, 1);
    assert!(records.is_empty());
}

#[test]
fn test_config_file_with_flag_override() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("rows.csv");
    fs::write(&input, "k,1\n\"broken\n").unwrap();
    let config = temp.path().join("job.toml");
    fs::write(
        &config,
        format!(
            "input = {:?}\noutput = {:?}\nout_shards = 5\niterations = 3\n",
            input.display().to_string(),
            temp.path().join("cfg").display().to_string()
        ),
    )
    .unwrap();
    let metrics = temp.path().join("metrics.json");

    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.arg("--config")
        .arg(&config)
        .args(["--out-shards", "2", "--job-name", "from-cli"])
        .arg("--metrics-out")
        .arg(&metrics)
        .assert()
        .success()
        .stdout(predicate::str::contains("rows_bad: 1"));

    let (shards, records) = read_shards(temp.path(), "cfg-");
    assert_eq!(shards, 2);
    assert_eq!(records, vec!["k,1"]);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&metrics).unwrap()).unwrap();
    assert_eq!(report["job_name"], "from-cli");
    assert_eq!(report["iterations"], 3);
    assert_eq!(report["counters"]["rows_bad"], 1);
}

#[test]
fn test_zero_shards_is_configuration_error() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("rows.csv");
    fs::write(&input, "a,1\n").unwrap();

    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.args(["--out-shards", "0"])
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(temp.path().join("never"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("out_shards"));

    let (shards, _) = read_shards(temp.path(), "never-");
    assert_eq!(shards, 0);
}

#[test]
fn test_missing_input_flag_is_configuration_error() {
    let temp = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.arg("--output")
        .arg(temp.path().join("x"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("input"));
}

#[test]
fn test_unreadable_input_fails() {
    let temp = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.arg("--input")
        .arg(temp.path().join("missing.csv"))
        .arg("--output")
        .arg(temp.path().join("x"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.csv"));
}

#[test]
fn test_negative_iterations_rejected_by_parser() {
    let mut cmd = Command::cargo_bin("mba-pipeline").unwrap();
    cmd.args(["--input", "a", "--output", "b", "--iterations=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
