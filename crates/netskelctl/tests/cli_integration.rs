//! CLI integration tests
//!
//! Tests netskelctl against a scratch registry using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

use netskel_core::time::current_time_secs;
use netskel_core::types::fields;
use netskel_core::{ClientRegistry, ClientStore};

const WEB: &str = "0b5e4c1d-9a9e-4f43-8d52-7d1b2a3c4e5f";
const DB: &str = "6ec558e1-5f06-4083-9070-206819b53916";
const UNKNOWN: &str = "f47ac10b-58cc-4372-a567-0e02b2c3d479";

struct Install {
    _dir: TempDir,
    config: PathBuf,
    db: PathBuf,
}

impl Install {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("netskel.toml");
        fs::write(
            &config,
            format!("base_dir = {:?}\n", dir.path().display().to_string()),
        )
        .unwrap();
        let db = dir.path().join("clients.db");

        let mut reg = ClientRegistry::open(&db, Duration::from_secs(2)).unwrap();
        let stale = (current_time_secs() - 10 * 86_400).to_string();
        let fresh = current_time_secs().to_string();
        reg.put_fields(
            WEB,
            &[(fields::HOSTNAME, "web01.example.com"), (fields::LAST_SEEN, stale.as_str())],
        )
        .unwrap();
        reg.put_fields(
            DB,
            &[(fields::HOSTNAME, "db01.example.com"), (fields::LAST_SEEN, fresh.as_str())],
        )
        .unwrap();

        Self {
            _dir: dir,
            config,
            db,
        }
    }

    fn ctl(&self) -> Command {
        let mut cmd = Command::cargo_bin("netskelctl")
            .expect("Failed to locate netskelctl binary - ensure it's built before running tests");
        cmd.env("NETSKEL_CONFIG", &self.config).env_remove("RUST_LOG");
        cmd
    }

    fn registry(&self) -> ClientRegistry {
        ClientRegistry::open(&self.db, Duration::from_secs(2)).unwrap()
    }
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("netskelctl")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("client registry"));
}

#[test]
fn test_list() {
    let install = Install::new();
    install
        .ctl()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Client ID"))
        .stdout(predicate::str::contains("web01.example.com"))
        .stdout(predicate::str::contains("db01.example.com"));
}

#[test]
fn test_disable_hides_from_list() {
    let install = Install::new();
    install.ctl().args(["disable", WEB]).assert().success();

    install
        .ctl()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("web01").not());

    install
        .ctl()
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web01"));

    install.ctl().args(["enable", WEB]).assert().success();
    assert_eq!(install.registry().get(WEB, fields::DISABLED).unwrap(), None);
}

#[test]
fn test_info() {
    let install = Install::new();
    install
        .ctl()
        .args(["info", "DB01"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("[{DB}]\n")))
        .stdout(predicate::str::contains("  hostname: db01.example.com\n"))
        .stdout(predicate::str::contains(WEB).not());
}

#[test]
fn test_audit() {
    let install = Install::new();
    install
        .ctl()
        .args(["audit", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains(WEB))
        .stdout(predicate::str::contains(DB).not());

    install
        .ctl()
        .args(["audit", "14"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_list_json() {
    let install = Install::new();
    let output = install.ctl().args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["uuid"], WEB);
}

#[test]
fn test_delete() {
    let install = Install::new();
    install.ctl().args(["delete", WEB]).assert().success();

    let reg = install.registry();
    assert!(!reg.contains(WEB).unwrap());
    assert_eq!(
        reg.get(DB, fields::HOSTNAME).unwrap().as_deref(),
        Some("db01.example.com")
    );
}

#[test]
fn test_put() {
    let install = Install::new();
    install
        .ctl()
        .args(["put", DB, "location", "rack 4"])
        .assert()
        .success();
    assert_eq!(
        install.registry().get(DB, "location").unwrap().as_deref(),
        Some("rack 4")
    );
}

#[test]
fn test_unknown_client() {
    let install = Install::new();
    for command in ["enable", "disable", "delete"] {
        install
            .ctl()
            .args([command, UNKNOWN])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown client"));
    }
    assert!(!install.registry().contains(UNKNOWN).unwrap());
}

#[test]
fn test_invalid_uuid() {
    let install = Install::new();
    install
        .ctl()
        .args(["disable", "web01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_missing_registry_is_not_created() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("netskel.toml");
    fs::write(
        &config,
        format!("base_dir = {:?}\n", dir.path().display().to_string()),
    )
    .unwrap();
    let db = dir.path().join("clients.db");

    let ctl = |args: &[&str]| {
        let mut cmd = Command::cargo_bin("netskelctl").unwrap();
        cmd.env("NETSKEL_CONFIG", &config).env_remove("RUST_LOG").args(args);
        cmd
    };

    ctl(&["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No clients found"))
        .stderr(predicate::str::contains("does not exist yet"));
    ctl(&["--json", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
    ctl(&["audit", "1"]).assert().success();
    ctl(&["disable", WEB])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown client"));

    assert!(!db.exists());
}
