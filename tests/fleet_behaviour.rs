//! Fleet behaviour exercised through the public library surface.

use std::time::Duration;

use gantry::test_support::{ScriptedCompute, failed_operation, instance, operation};
use gantry::{Fleet, FleetError, InstanceStatus, OperationStatus, ZoneScope};

fn scope() -> ZoneScope {
    ZoneScope::new("proj-1", "zone-a")
}

fn fast_fleet(api: ScriptedCompute) -> Fleet<ScriptedCompute> {
    Fleet::new(api)
        .with_poll_interval(Duration::from_millis(1))
        .with_wait_timeout(Duration::from_millis(250))
}

#[tokio::test]
async fn start_polls_the_operation_to_completion() {
    let api = ScriptedCompute::new();
    api.push_mutation(operation("op-start", OperationStatus::Pending));
    api.push_poll(operation("op-start", OperationStatus::Pending));
    api.push_poll(operation("op-start", OperationStatus::Running));
    api.push_poll(operation("op-start", OperationStatus::Done));
    let fleet = fast_fleet(api.clone());
    let mut progress = Vec::new();

    fleet
        .start(&scope(), "vm1", &mut progress)
        .await
        .expect("start should finish");

    assert_eq!(api.calls().len(), 4);
    let text = String::from_utf8(progress).expect("progress should be UTF-8");
    assert!(text.contains("Waiting for operation op-start to finish..."));
    assert!(text.contains("done."));
}

#[tokio::test]
async fn a_failed_operation_aborts_the_command_with_its_payload() {
    let api = ScriptedCompute::new();
    api.push_mutation(operation("op-stop", OperationStatus::Pending));
    api.push_poll(failed_operation(
        "op-stop",
        "RESOURCE_NOT_READY",
        "instance is repairing",
    ));
    let fleet = fast_fleet(api);
    let mut progress = Vec::new();

    let err = fleet
        .stop(&scope(), "vm1", &mut progress)
        .await
        .expect_err("failed operation should abort");

    assert_eq!(
        err.to_string(),
        "operation op-stop failed: RESOURCE_NOT_READY: instance is repairing"
    );
    assert!(matches!(err, FleetError::Operation { .. }));
}

#[tokio::test]
async fn listing_renders_the_fleet_one_line_per_instance() {
    let api = ScriptedCompute::new();
    api.push_listing(vec![
        instance("builder", InstanceStatus::Running, Some("34.1.2.3")),
        instance("scratch", InstanceStatus::Terminated, None),
    ]);
    let fleet = fast_fleet(api);
    let mut out = Vec::new();

    fleet
        .list(&scope(), &mut out)
        .await
        .expect("listing should succeed");

    let text = String::from_utf8(out).expect("output should be UTF-8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], " - builder, RUNNING, n1-standard-8, 34.1.2.3");
    assert_eq!(lines[1], " - scratch, TERMINATED, n1-standard-8");
}
