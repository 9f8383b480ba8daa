//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build command for the partimport-cli binary (finds it in target/debug when run via cargo test).
fn partimport_cli() -> Command {
    cargo_bin_cmd!("partimport-cli")
}

/// Path to partimport library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("partimport")
        .join("tests")
        .join("fixtures")
}

/// Copy the drawing fixture into a scratch directory so tests can write it.
fn scratch_drawing() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drawing.json");
    std::fs::copy(fixtures_dir().join("drawing.json"), &path).unwrap();
    (dir, path)
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_cli_help() {
    let mut cmd = partimport_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("parts list"));
}

#[test]
fn test_cli_version() {
    let mut cmd = partimport_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_entries_human() {
    let mut cmd = partimport_cli();
    let path = fixtures_dir().join("panel_parts.csv");

    cmd.arg("entries").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("HCB11"))
        .stdout(predicate::str::contains("Skipped: 3"));
}

#[test]
fn test_cli_entries_json() {
    let mut cmd = partimport_cli();
    let path = fixtures_dir().join("panel_parts.csv");

    let output = cmd
        .arg("entries")
        .arg(path)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["valid"], 3);
    assert_eq!(json["entries"][0]["symbol"], "HCB11");
}

#[test]
fn test_cli_entries_nonexistent_file() {
    let mut cmd = partimport_cli();

    cmd.arg("entries").arg("does_not_exist.xlsx");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_import_in_place() {
    let (_dir, drawing) = scratch_drawing();
    let mut cmd = partimport_cli();

    cmd.arg("import")
        .arg(fixtures_dir().join("panel_parts.csv"))
        .arg("--drawing")
        .arg(&drawing);

    cmd.assert()
        .code(0)
        .stdout(predicate::str::contains("Placed:    3"));

    let json = read_json(&drawing);
    let blocks = json["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0]["pins_attached"], true);
}

#[test]
fn test_cli_import_to_output() {
    let (dir, drawing) = scratch_drawing();
    let output = dir.path().join("out.json");
    let mut cmd = partimport_cli();

    cmd.arg("import")
        .arg(fixtures_dir().join("panel_parts.csv"))
        .arg("--drawing")
        .arg(&drawing)
        .arg("--output")
        .arg(&output)
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"placed\""));

    assert_eq!(read_json(&output)["blocks"].as_array().unwrap().len(), 3);
    assert!(read_json(&drawing)["blocks"].as_array().unwrap().is_empty());
}

#[test]
fn test_cli_import_partial_failure_exit_code() {
    let (dir, drawing) = scratch_drawing();
    let mut json = read_json(&drawing);
    json["library"].as_object_mut().unwrap().remove("HPB11");
    std::fs::write(&drawing, serde_json::to_string(&json).unwrap()).unwrap();

    let mut cmd = partimport_cli();
    cmd.arg("import")
        .arg(fixtures_dir().join("panel_parts.csv"))
        .arg("--drawing")
        .arg(&drawing);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("HPB11"));

    let mut cmd = partimport_cli();
    cmd.arg("import")
        .arg(fixtures_dir().join("panel_parts.csv"))
        .arg("--drawing")
        .arg(dir.path().join("drawing.json"))
        .arg("--output")
        .arg(dir.path().join("aborted.json"))
        .arg("--abort-on-error");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Aborted at HPB11"))
        .stderr(predicate::str::contains("Skipped").not())
        .stderr(predicate::str::contains("Error:").not());
}

#[test]
fn test_cli_import_unreadable_spreadsheet() {
    let (_dir, drawing) = scratch_drawing();
    let before = std::fs::read_to_string(&drawing).unwrap();
    let mut cmd = partimport_cli();

    cmd.arg("import")
        .arg("nonexistent.xlsx")
        .arg("--drawing")
        .arg(&drawing);

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open the spreadsheet"));
    assert_eq!(std::fs::read_to_string(&drawing).unwrap(), before);
}

#[test]
fn test_cli_import_with_config() {
    let (dir, drawing) = scratch_drawing();
    let config = dir.path().join("options.json");
    std::fs::write(&config, r#"{ "installation_property": "Site" }"#).unwrap();

    let mut cmd = partimport_cli();
    cmd.arg("import")
        .arg(fixtures_dir().join("panel_parts.csv"))
        .arg("--drawing")
        .arg(&drawing)
        .arg("--config")
        .arg(&config);
    cmd.assert().success();

    // "Site" is not set in the drawing, so INST is empty
    let json = read_json(&drawing);
    let inst = json["blocks"][0]["attributes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["tag"] == "INST")
        .cloned()
        .unwrap();
    assert_eq!(inst["text"], "");
}

#[test]
fn test_cli_missing_drawing() {
    let mut cmd = partimport_cli();

    cmd.arg("import")
        .arg(fixtures_dir().join("panel_parts.csv"))
        .arg("--drawing")
        .arg("no_such_drawing.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot load drawing"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let path = fixtures_dir().join("panel_parts.csv");

    let mut cmd_human = partimport_cli();
    cmd_human.arg("entries").arg(&path).arg("--format").arg("human");
    let human_output = cmd_human.output().unwrap();

    let mut cmd_json = partimport_cli();
    cmd_json.arg("entries").arg(&path).arg("--format").arg("json");
    let json_output = cmd_json.output().unwrap();

    assert_ne!(
        human_output.stdout,
        json_output.stdout,
        "Different formats should produce different output"
    );
}
