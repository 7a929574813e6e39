//! Tests for ForwardEngine::list

use pretty_assertions::assert_eq;
use vortex_forward::{ForwardEngine, ForwardStatus, FsUnitStore, ServiceId, TunnelConfig};
use vortex_test_utils::{FakeController, TestUnitDir, UnitState};

fn engine(
    config: TunnelConfig,
    controller: &FakeController,
    units: &TestUnitDir,
) -> ForwardEngine<TunnelConfig, FakeController, FsUnitStore> {
    ForwardEngine::new(config, controller.clone(), units.store())
}

fn status(port: u16, status: &str, enabled: &str, remote: &str) -> ForwardStatus {
    ForwardStatus {
        port,
        status: status.to_string(),
        enabled: enabled.to_string(),
        remote: remote.to_string(),
    }
}

#[test]
fn test_list_merges_declared_and_live_state() {
    let units = TestUnitDir::new();
    let controller = FakeController::new();
    controller.install(&ServiceId::canonical("edge", 443), UnitState::running());
    controller.install(&ServiceId::canonical("edge", 80), UnitState::stopped());

    let config = TunnelConfig::new("edge")
        .with_remote("10.0.0.2")
        .with_ports([8080, 443, 80]);
    let statuses = engine(config, &controller, &units).list();

    assert_eq!(
        statuses,
        vec![
            status(80, "inactive", "enabled", "10.0.0.2:80"),
            status(443, "active", "enabled", "10.0.0.2:443"),
            status(8080, "inactive", "disabled", "10.0.0.2:8080"),
        ]
    );
}

#[test]
fn test_list_falls_back_to_legacy_unit() {
    let units = TestUnitDir::new();
    let controller = FakeController::new();
    let legacy = ServiceId::legacy(443);
    controller.install(&legacy, UnitState::running());

    let config = TunnelConfig::new("edge").with_remote("10.0.0.2").with_ports([443]);
    let statuses = engine(config, &controller, &units).list();

    assert_eq!(statuses, vec![status(443, "active", "enabled", "10.0.0.2:443")]);
    assert_eq!(
        controller.calls(),
        vec![
            "is-active vortexl2-fwd-edge-443.service".to_string(),
            "is-active vortexl2-fwd-443.service".to_string(),
            "is-enabled vortexl2-fwd-443.service".to_string(),
        ]
    );
}

#[test]
fn test_list_does_not_migrate() {
    let units = TestUnitDir::new();
    let legacy = ServiceId::legacy(443);
    units.write_unit(&legacy, "[Unit]\n");
    let controller = FakeController::watching(units.path());

    let config = TunnelConfig::new("edge").with_remote("10.0.0.2").with_ports([443]);
    engine(config, &controller, &units).list();

    units.assert_unit_exists(&legacy);
    assert!(controller.calls().iter().all(|c| c.starts_with("is-")));
}

#[test]
fn test_list_without_remote_shows_placeholder() {
    let units = TestUnitDir::new();
    let controller = FakeController::new();

    let statuses = engine(TunnelConfig::new("edge").with_ports([22]), &controller, &units).list();

    assert_eq!(statuses, vec![status(22, "inactive", "disabled", "-")]);
}

#[test]
fn test_list_empty() {
    let units = TestUnitDir::new();
    let controller = FakeController::new();

    assert!(engine(TunnelConfig::new("edge"), &controller, &units).list().is_empty());
    assert!(controller.calls().is_empty());
}

#[test]
fn test_status_serializes_to_json() {
    let row = status(443, "active", "enabled", "10.0.0.2:443");

    let json = serde_json::to_value(&row).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "port": 443,
            "status": "active",
            "enabled": "enabled",
            "remote": "10.0.0.2:443",
        })
    );
    assert!(row.is_active());
}
