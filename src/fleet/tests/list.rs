//! Tests for listing and line rendering.

use crate::api::types::{AccessConfig, InstanceStatus, NetworkInterface};
use crate::fleet::{FleetError, instance_line};
use crate::test_support::{ScriptedCompute, accelerator, instance};

use super::{fast_fleet, scope};

#[test]
fn instance_line_renders_name_status_and_machine_type() {
    let entry = instance("vm1", InstanceStatus::Running, None);
    assert_eq!(instance_line(&entry), " - vm1, RUNNING, n1-standard-8");
}

#[test]
fn instance_line_appends_accelerators_and_every_address() {
    let mut entry = instance("vm1", InstanceStatus::Running, Some("34.1.2.3"));
    entry.guest_accelerators.push(accelerator("nvidia-tesla-v100", 1));
    entry.network_interfaces.push(NetworkInterface {
        access_configs: vec![AccessConfig {
            nat_ip: Some(String::from("35.0.0.1")),
        }],
    });

    assert_eq!(
        instance_line(&entry),
        " - vm1, RUNNING, n1-standard-8, v100*1, 34.1.2.3, 35.0.0.1"
    );
}

#[tokio::test]
async fn list_writes_one_line_per_instance() {
    let api = ScriptedCompute::new();
    api.push_listing(vec![
        instance("vm1", InstanceStatus::Running, Some("34.1.2.3")),
        instance("vm2", InstanceStatus::Terminated, None),
    ]);
    let fleet = fast_fleet(api);
    let mut out = Vec::new();

    fleet
        .list(&scope(), &mut out)
        .await
        .expect("listing should succeed");

    let text = String::from_utf8(out).expect("output should be UTF-8");
    assert_eq!(
        text,
        " - vm1, RUNNING, n1-standard-8, 34.1.2.3\n - vm2, TERMINATED, n1-standard-8\n"
    );
}

#[tokio::test]
async fn list_of_an_empty_fleet_writes_nothing() {
    let api = ScriptedCompute::new();
    api.push_listing(Vec::new());
    let fleet = fast_fleet(api);
    let mut out = Vec::new();

    fleet
        .list(&scope(), &mut out)
        .await
        .expect("empty listing is valid");
    assert!(out.is_empty());
}

#[tokio::test]
async fn list_propagates_an_api_failure() {
    let api = ScriptedCompute::new();
    api.fail_listing("quota exceeded");
    let fleet = fast_fleet(api);
    let mut out = Vec::new();

    let err = fleet
        .list(&scope(), &mut out)
        .await
        .expect_err("listing failure should propagate");
    assert!(matches!(err, FleetError::Api(_)), "got {err}");
    assert!(out.is_empty());
}
