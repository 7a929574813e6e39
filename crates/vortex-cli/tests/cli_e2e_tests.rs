//! CLI end-to-end tests that invoke the compiled `vortexl2-fwd` binary.
//!
//! Each test runs the binary against a temporary config, a temporary unit
//! directory and a stub `systemctl` script that logs its arguments.
#![cfg(unix)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use vortex_forward::TunnelConfig;
use vortex_test_utils::StubSystemctl;

struct Host {
    temp: TempDir,
    systemctl: StubSystemctl,
}

impl Host {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("units")).unwrap();
        let systemctl = StubSystemctl::install(temp.path());
        Self { temp, systemctl }
    }

    fn with_failing(verb: &str, message: &str) -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("units")).unwrap();
        let systemctl = StubSystemctl::install_failing(temp.path(), verb, message);
        Self { temp, systemctl }
    }

    fn config_path(&self) -> PathBuf {
        self.temp.path().join("tunnel.toml")
    }

    fn unit_dir(&self) -> PathBuf {
        self.temp.path().join("units")
    }

    fn unit(&self, name: &str) -> PathBuf {
        self.unit_dir().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vortexl2-fwd"));
        cmd.env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path())
            .arg("--unit-dir")
            .arg(self.unit_dir())
            .arg("--systemctl")
            .arg(self.systemctl.program());
        cmd
    }

    fn init(&self) {
        self.cmd()
            .args(["init", "--name", "edge", "--remote", "10.30.30.2"])
            .assert()
            .success();
    }

    fn config(&self) -> TunnelConfig {
        TunnelConfig::load(&self.config_path()).unwrap()
    }
}

fn exists(path: &Path) -> bool {
    path.is_file()
}

#[test]
fn test_help_lists_commands() {
    Command::new(assert_cmd::cargo::cargo_bin!("vortexl2-fwd"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("install-template"));
}

#[test]
fn test_commands_require_config() {
    let host = Host::new();

    host.cmd()
        .args(["add", "443"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("vortexl2-fwd init"));

    assert!(host.systemctl.calls().is_empty());
}

#[test]
fn test_init_writes_config() {
    let host = Host::new();

    host.init();

    let config = host.config();
    assert_eq!(config.name, "edge");
    assert_eq!(config.remote_forward_ip.as_deref(), Some("10.30.30.2"));
    assert_eq!(config.listen_ip, "0.0.0.0");
    assert!(config.ports().is_empty());
}

#[test]
fn test_init_keeps_declared_ports() {
    let host = Host::new();
    host.init();
    host.cmd().args(["add", "443"]).assert().success();

    host.cmd()
        .args(["init", "--name", "edge", "--listen", "127.0.0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));

    let config = host.config();
    assert_eq!(config.ports(), &[443]);
    assert_eq!(config.listen_ip, "127.0.0.1");
    assert_eq!(config.remote_forward_ip.as_deref(), Some("10.30.30.2"));
}

#[test]
fn test_add_creates_units_and_declares_ports() {
    let host = Host::new();
    host.init();

    host.cmd()
        .args(["add", "443, abc,8080"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Port 443: Port forward for 443 created (listen 0.0.0.0 -> 10.30.30.2:443)",
        ))
        .stdout(predicate::str::contains("Port 'abc': Invalid port number"));

    assert_eq!(host.config().ports(), &[443, 8080]);
    let unit = std::fs::read_to_string(host.unit("vortexl2-fwd-edge-443.service")).unwrap();
    assert!(unit.contains("TCP4-LISTEN:443,bind=0.0.0.0,reuseaddr,fork TCP4:10.30.30.2:443"));
    assert!(
        host.systemctl
            .calls()
            .contains(&"enable --now vortexl2-fwd-edge-8080.service".to_string())
    );
}

#[test]
fn test_add_without_remote_declares_nothing() {
    let host = Host::new();
    host.cmd().args(["init", "--name", "edge"]).assert().success();

    host.cmd()
        .args(["add", "443"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Port 443: Remote forward IP not configured"));

    assert!(host.config().ports().is_empty());
    assert!(!exists(&host.unit("vortexl2-fwd-edge-443.service")));
}

#[test]
fn test_remove_deletes_units_and_ports() {
    let host = Host::new();
    host.init();
    host.cmd().args(["add", "80,443"]).assert().success();

    host.cmd()
        .args(["remove", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Port 80: Port forward for 80 removed"));

    assert_eq!(host.config().ports(), &[443]);
    assert!(!exists(&host.unit("vortexl2-fwd-edge-80.service")));
    assert!(exists(&host.unit("vortexl2-fwd-edge-443.service")));
    assert!(!host.unit(".vortexl2-fwd-edge-80.service.lock").exists());
}

#[test]
fn test_add_migrates_legacy_unit() {
    let host = Host::new();
    host.init();
    std::fs::write(host.unit("vortexl2-fwd-443.service"), "[Unit]\n").unwrap();

    host.cmd().args(["add", "443"]).assert().success();

    assert!(!exists(&host.unit("vortexl2-fwd-443.service")));
    let calls = host.systemctl.calls();
    assert!(calls.contains(&"stop vortexl2-fwd-443.service".to_string()));
    assert!(calls.contains(&"disable vortexl2-fwd-443.service".to_string()));
}

#[test]
fn test_list_json() {
    let host = Host::new();
    host.init();
    host.cmd().args(["add", "443"]).assert().success();

    let output = host.cmd().args(["list", "--json"]).output().unwrap();

    assert!(output.status.success());
    let statuses: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        statuses,
        vec![serde_json::json!({
            "port": 443,
            "status": "inactive",
            "enabled": "disabled",
            "remote": "10.30.30.2:443",
        })]
    );
}

#[test]
fn test_list_table() {
    let host = Host::new();
    host.init();
    host.cmd().args(["add", "8080"]).assert().success();

    host.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("PORT"))
        .stdout(predicate::str::contains("10.30.30.2:8080"));
}

#[test]
fn test_all_operations_with_nothing_declared() {
    let host = Host::new();
    host.init();

    for verb in ["start", "stop", "restart"] {
        host.cmd()
            .arg(verb)
            .assert()
            .success()
            .stdout(predicate::str::contains("No port forwards configured"));
    }
}

#[test]
fn test_stop_single_port() {
    let host = Host::new();
    host.init();
    host.cmd().args(["add", "443"]).assert().success();

    host.cmd()
        .args(["stop", "443"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Port 443: stopped (vortexl2-fwd-edge-443.service)",
        ));
}

#[test]
fn test_single_port_failure_exits_nonzero() {
    let host = Host::with_failing("start", "Unit is masked.");
    host.init();
    host.cmd().args(["add", "443"]).assert().success();

    host.cmd()
        .args(["start", "443"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Port 443: failed to start - Unit is masked."));

    assert_eq!(host.config().ports(), &[443]);
}

#[test]
fn test_batch_failure_exits_zero() {
    let host = Host::with_failing("start", "Unit is masked.");
    host.init();
    host.cmd().args(["add", "443"]).assert().success();

    host.cmd()
        .arg("start")
        .assert()
        .success()
        .stdout(predicate::str::contains("Port 443: failed to start - Unit is masked."));
}

#[test]
fn test_restart_recreates_missing_unit() {
    let host = Host::new();
    host.init();
    host.cmd().args(["add", "443"]).assert().success();
    std::fs::remove_file(host.unit("vortexl2-fwd-edge-443.service")).unwrap();

    host.cmd()
        .args(["restart", "443"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Port 443: recreated and started"));

    assert!(exists(&host.unit("vortexl2-fwd-edge-443.service")));
}

#[test]
fn test_install_template() {
    let host = Host::new();
    host.init();

    host.cmd()
        .arg("install-template")
        .assert()
        .success()
        .stdout(predicate::str::contains("No template required (per-port units)"));
}
