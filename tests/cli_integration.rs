//! End-to-end tests for the riskmatrix binary against a temporary store.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn riskmatrix(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("riskmatrix").unwrap();
    cmd.current_dir(workdir)
        .env_remove("RISKMATRIX_STORE_DIR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--plain")
        .arg("--store")
        .arg(workdir.join("store"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

fn add(workdir: &Path, axis: &str, category: &str, rating: &str, explanation: &str) {
    riskmatrix(workdir)
        .args(["add", "Acme Dispute", "--axis", axis, "--category", category])
        .args(["--rating", rating, "--explanation", explanation])
        .assert()
        .success();
}

#[test]
fn test_add_show_and_export_markdown() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "likelihood", "Financial", "3", "Late payments");
    add(dir.path(), "impact", "Operational", "Major", "Line stoppage");

    let table = stdout_of(riskmatrix(dir.path()).args(["export", "Acme Dispute"]));
    assert_eq!(
        table,
        "| Type | Category | Explanation | Risk Rating |\n\
         | --- | --- | --- | --- |\n\
         | Likelihood | Financial | Late payments | Possible (3) |\n\
         | Severity | Operational | Line stoppage | Major (4) |\n"
    );

    let shown = stdout_of(riskmatrix(dir.path()).args(["show", "Acme Dispute", "--format", "text"]));
    assert!(shown.starts_with("Risk Assessment for Acme Dispute\n"));
    assert!(shown.contains("Assessed Risk: Medium"));
}

#[test]
fn test_export_to_file_and_import_elsewhere() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "severity", "Financial", "5", "Penalty");
    let file = dir.path().join("out").join("acme.json");

    riskmatrix(dir.path())
        .args(["export", "Acme Dispute", "--format", "json", "--output"])
        .arg(&file)
        .assert()
        .success();
    assert!(fs::read_to_string(&file).unwrap().contains("\"matterName\": \"Acme Dispute\""));

    let other = TempDir::new().unwrap();
    riskmatrix(other.path()).arg("import").arg(&file).assert().success();
    let listed = stdout_of(riskmatrix(other.path()).arg("list"));
    assert_eq!(listed, "Acme Dispute\n");

    // A second import of the same matter needs --force.
    riskmatrix(other.path()).arg("import").arg(&file).assert().code(4);
    riskmatrix(other.path())
        .arg("import")
        .arg(&file)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_exit_codes() {
    let dir = TempDir::new().unwrap();

    // Missing matter.
    riskmatrix(dir.path()).args(["show", "Nobody"]).assert().code(6);
    riskmatrix(dir.path()).args(["delete", "Nobody"]).assert().code(6);

    // Rating out of range is rejected and nothing is saved.
    riskmatrix(dir.path())
        .args(["add", "Acme", "--axis", "likelihood", "--category", "Financial"])
        .args(["--rating", "7", "--explanation", "x"])
        .assert()
        .code(4);
    riskmatrix(dir.path()).args(["show", "Acme"]).assert().code(6);

    // Corrupt record.
    let store = dir.path().join("store");
    fs::create_dir_all(&store).unwrap();
    fs::write(store.join("assessment_Broken.json"), "{oops").unwrap();
    riskmatrix(dir.path()).args(["show", "Broken"]).assert().code(5);

    // Explicit config that does not exist.
    riskmatrix(dir.path())
        .args(["list", "--config", "missing.toml"])
        .assert()
        .code(3);
}

#[test]
fn test_score_json_scenario() {
    let dir = TempDir::new().unwrap();
    let json = stdout_of(riskmatrix(dir.path()).args([
        "score",
        "--likelihood",
        "5,4,4",
        "--severity",
        "3",
        "--format",
        "json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!((value["composite"].as_f64().unwrap() - 13.5).abs() < 1e-9);
    assert_eq!(value["band"], "high");
    assert_eq!(value["highlight"]["likelihood"], 5);
}

#[test]
fn test_shared_list_layout_and_delete() {
    let dir = TempDir::new().unwrap();
    for name in ["One", "Two"] {
        riskmatrix(dir.path())
            .args(["--layout", "shared-list", "add", name, "--axis", "severity"])
            .args(["--category", "Compliance", "--rating", "2", "--explanation", "Audit"])
            .assert()
            .success();
    }
    assert!(dir.path().join("store").join("savedAssessments.json").exists());

    riskmatrix(dir.path())
        .args(["--layout", "shared-list", "delete", "One"])
        .assert()
        .success();
    let listed = stdout_of(riskmatrix(dir.path()).args(["--layout", "shared-list", "list"]));
    assert_eq!(listed, "Two\n");
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    riskmatrix(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".riskmatrix.toml").exists());
    riskmatrix(dir.path()).arg("init").assert().failure();
    riskmatrix(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn test_discovered_config_sets_rule() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".riskmatrix.toml"),
        "[scoring]\nclassification = \"half-open\"\n",
    )
    .unwrap();
    let json = stdout_of(riskmatrix(dir.path()).args([
        "score",
        "--likelihood",
        "5",
        "--severity",
        "4",
        "--format",
        "json",
    ]));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["band"], "extreme");
}
