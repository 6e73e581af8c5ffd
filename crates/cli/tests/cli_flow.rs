// Integration tests for the medreg binary.
// Run with: cargo test -p medreg-cli --test cli_flow

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use httpmock::prelude::*;

fn medreg() -> Command {
    Command::new(env!("CARGO_BIN_EXE_medreg"))
}

const DISTRIBUTORS_CSV: &str =
    "KOD_DISTRIBUTORA;NAZEV;ZEME;MESTO\nDIST01;Pharmos;;Ostrava\n";

fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn import_then_inspect_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");
    let file = write_fixture(tmp.path(), "distributori_2024-01-15.csv", DISTRIBUTORS_CSV);

    let output = medreg()
        .args([
            "import",
            "--family",
            "distributors",
            "--file",
            file.to_str().unwrap(),
            "--db",
            db.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("failed to run medreg");
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["Completed"]["period"], "2024-01");
    assert_eq!(report["Completed"]["valid_from"], "2024-01-15");
    assert_eq!(report["Completed"]["sections"][0]["new"], 1);

    let output = medreg()
        .args([
            "active",
            "--dataset",
            "distributors",
            "--db",
            db.to_str().unwrap(),
            "--json",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records[0]["business_key"], "DIST01");

    let output = medreg()
        .args([
            "history",
            "--dataset",
            "distributors",
            "--key",
            "DIST01",
            "--db",
            db.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("currently active"), "stderr: {}", stderr);

    let output = medreg()
        .args(["runs", "--db", db.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let runs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(runs.as_array().unwrap().len(), 1);
    assert_eq!(runs[0]["dataset"], "distributors");

    let output = medreg()
        .args(["status", "--db", db.to_str().unwrap(), "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let counts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(counts[0]["dataset"], "distributors");
    assert_eq!(counts[0]["active"], 1);
}

#[test]
fn reimporting_the_same_period_exits_zero_with_a_notice() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");
    let file = write_fixture(tmp.path(), "distributori_2024-01-15.csv", DISTRIBUTORS_CSV);

    let run = |args: &[&str]| medreg().args(args).output().unwrap();
    let args = [
        "import",
        "--family",
        "distributors",
        "--file",
        file.to_str().unwrap(),
        "--db",
        db.to_str().unwrap(),
    ];
    assert_eq!(run(&args).status.code(), Some(0));

    let output = run(&args);
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already processed"), "stderr: {}", stderr);
}

#[test]
fn duplicate_business_key_exits_3() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");
    let file = write_fixture(
        tmp.path(),
        "distributori_2024-01-15.csv",
        "KOD_DISTRIBUTORA;NAZEV\nDIST01;Pharmos\nDIST01;Pharmos again\n",
    );

    let output = medreg()
        .args([
            "import",
            "--family",
            "distributors",
            "--file",
            file.to_str().unwrap(),
            "--db",
            db.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(3),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("duplicate business key"), "stderr: {}", stderr);
}

#[test]
fn undated_stdin_without_overrides_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");

    let mut child = medreg()
        .args([
            "import",
            "--family",
            "distributors",
            "--db",
            db.to_str().unwrap(),
        ])
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(DISTRIBUTORS_CSV.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--valid-from"), "stderr: {}", stderr);
}

#[test]
fn unknown_dataset_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");

    let output = medreg()
        .args([
            "active",
            "--dataset",
            "nonsense",
            "--db",
            db.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_family_exits_2() {
    let output = medreg()
        .args(["import", "--family", "dpl", "--file", "x.zip"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_input_file_exits_2() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");

    let output = medreg()
        .args([
            "import",
            "--family",
            "distributors",
            "--file",
            "/no/such/file_2024-01.csv",
            "--db",
            db.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn history_of_unknown_record_exits_1() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");

    let output = medreg()
        .args([
            "history",
            "--dataset",
            "distributors",
            "--key",
            "NOPE",
            "--db",
            db.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn url_source_is_fetched_and_imported() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/opendata/distributori_2024-02-15.csv");
        then.status(200).body(DISTRIBUTORS_CSV);
    });

    let output = medreg()
        .args([
            "import",
            "--family",
            "distributors",
            "--url",
            &server.url("/opendata/distributori_2024-02-15.csv"),
            "--db",
            db.to_str().unwrap(),
            "--json",
        ])
        .output()
        .unwrap();

    mock.assert();
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["Completed"]["period"], "2024-02");
    assert_eq!(report["Completed"]["valid_from"], "2024-02-15");
}

#[test]
fn fetch_failure_exits_7() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("registry.db");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone_2024-01.csv");
        then.status(404);
    });

    let output = medreg()
        .args([
            "import",
            "--family",
            "distributors",
            "--url",
            &server.url("/gone_2024-01.csv"),
            "--db",
            db.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(7),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
