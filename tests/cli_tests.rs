//! End-to-end tests of the `edgestore` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Env {
    home: TempDir,
}

impl Env {
    fn new() -> Self {
        Self {
            home: TempDir::new().expect("create temp home"),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("edgestore").expect("binary built");
        cmd.env("EDGESTORE_HOME", self.home.path())
            .env_remove("RUST_LOG")
            .arg("--root")
            .arg(self.home.path().join("stores"));
        cmd
    }

    fn create(&self, payload: &str) {
        self.cmd()
            .args(["create", "--store", "demo", "--entity", "task", payload])
            .assert()
            .success();
    }
}

#[test]
fn create_prints_business_id() {
    let env = Env::new();
    env.cmd()
        .args([
            "create",
            "--store",
            "demo",
            "--entity",
            "task",
            r#"{"businessId":"t-1","status":"running"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("t-1\n"));

    assert!(env.home.path().join("stores/demo/store.db").exists());
}

#[test]
fn create_reads_payload_from_stdin() {
    let env = Env::new();
    env.cmd()
        .args(["create", "--store", "demo", "--entity", "task", "-"])
        .write_stdin(r#"{"businessId":"t-9","status":"queued"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("t-9"));
}

#[test]
fn query_json_lines_follow_updates() {
    let env = Env::new();
    env.create(r#"{"businessId":"t-1","status":"running"}"#);
    env.create(r#"{"businessId":"t-2","status":"running"}"#);

    env.cmd()
        .args([
            "update",
            "--store",
            "demo",
            "--entity",
            "task",
            "--id",
            "t-1",
            r#"{"businessId":"t-1","status":"done"}"#,
        ])
        .assert()
        .success();

    env.cmd()
        .args([
            "--json", "query", "--store", "demo", "--entity", "task", "--eq", "status=done",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"record""#))
        .stdout(predicate::str::contains(r#""businessId":"t-1""#))
        .stdout(predicate::str::contains("t-2").not());
}

#[test]
fn changes_lists_mutations_in_order() {
    let env = Env::new();
    env.create(r#"{"businessId":"t-1","status":"running"}"#);
    env.cmd()
        .args([
            "delete", "--store", "demo", "--entity", "task", "--id", "t-1", "--source", "sync",
            "--actor", "peer",
        ])
        .assert()
        .success();

    let output = env
        .cmd()
        .args(["--json", "changes", "--store", "demo"])
        .output()
        .expect("run edgestore");
    assert!(output.status.success());

    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["payload"]["operation"], "CREATE");
    assert_eq!(lines[1]["payload"]["operation"], "DELETE");
    assert_eq!(lines[1]["payload"]["source"], "sync");
    assert_eq!(lines[1]["payload"]["actor"], "peer");
}

#[test]
fn update_with_wrong_identifier_fails() {
    let env = Env::new();
    env.create(r#"{"businessId":"t-1","status":"running"}"#);

    env.cmd()
        .args([
            "update",
            "--store",
            "demo",
            "--entity",
            "task",
            "--id",
            "t-1",
            r#"{"businessId":"t-2","status":"done"}"#,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("business identifier mismatch"));
}

#[test]
fn blank_identifier_fails() {
    let env = Env::new();
    env.cmd()
        .args(["create", "--store", "demo", "--entity", "task", r#"{"status":"x"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid business identifier"));
}

#[test]
fn unsupported_filter_fails() {
    let env = Env::new();
    env.cmd()
        .args([
            "query", "--store", "demo", "--entity", "task", "--gt", "status=high",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported GT filter value of type string"));
}

#[test]
fn get_missing_record_fails() {
    let env = Env::new();
    env.cmd()
        .args(["get", "--store", "demo", "--entity", "task", "--id", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no task record with id 'nope'"));
}

#[test]
fn invalid_store_name_fails() {
    let env = Env::new();
    env.cmd()
        .args(["changes", "--store", "../outside"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid store name"));
}

#[test]
fn invalid_config_file_fails() {
    let env = Env::new();
    let config = env.home.path().join("bad.toml");
    std::fs::write(&config, "[storage]\npool_size = 0\n").unwrap();

    env.cmd()
        .arg("--config")
        .arg(&config)
        .args(["changes", "--store", "demo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("storage.pool_size"));
}

#[test]
fn empty_store_reports_no_changes() {
    let env = Env::new();
    env.cmd()
        .args(["changes", "--store", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes recorded"));
}
