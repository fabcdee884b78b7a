//! Tests for GPU token mapping and accelerator reconfiguration.

use rstest::rstest;

use crate::api::types::OperationStatus;
use crate::fleet::{FleetError, GpuKind};
use crate::test_support::{ApiCall, ScriptedCompute, failed_operation, operation};

use super::{fast_fleet, scope};

#[rstest]
#[case("v100", GpuKind::V100)]
#[case("T4", GpuKind::T4)]
#[case("none", GpuKind::None)]
fn gpu_tokens_parse_case_insensitively(#[case] token: &str, #[case] expected: GpuKind) {
    assert_eq!(token.parse::<GpuKind>().expect("token is valid"), expected);
}

#[test]
fn unknown_gpu_token_is_rejected() {
    let err = "a100".parse::<GpuKind>().expect_err("a100 is not offered");
    assert!(err.to_string().contains("v100, t4, none"), "got {err}");
}

#[test]
fn none_maps_to_an_empty_accelerator_list() {
    let body = GpuKind::None.machine_resources(&scope());
    assert!(body.guest_accelerators.is_empty());
}

#[rstest]
#[case(GpuKind::V100, "nvidia-tesla-v100")]
#[case(GpuKind::T4, "nvidia-tesla-t4")]
fn gpu_maps_to_one_zone_scoped_accelerator(#[case] gpu: GpuKind, #[case] model: &str) {
    let body = gpu.machine_resources(&scope());

    assert_eq!(body.guest_accelerators.len(), 1);
    let requested = &body.guest_accelerators[0];
    assert_eq!(requested.accelerator_count, 1);
    assert_eq!(
        requested.accelerator_type,
        format!(
            "https://www.googleapis.com/compute/v1/projects/proj-1/zones/zone-a/acceleratorTypes/{model}"
        )
    );
}

#[tokio::test]
async fn detaching_issues_an_empty_body_and_waits() {
    let api = ScriptedCompute::new();
    api.push_mutation(operation("op-9", OperationStatus::Pending));
    api.push_poll(operation("op-9", OperationStatus::Done));
    let fleet = fast_fleet(api.clone());
    let mut progress = Vec::new();

    fleet
        .set_accelerator(&scope(), "vm1", GpuKind::None, &mut progress)
        .await
        .expect("detach should succeed");

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    assert!(
        matches!(calls[0], ApiCall::SetMachineResources { ref instance, ref body }
            if instance == "vm1" && body.guest_accelerators.is_empty()),
        "unexpected first call: {:?}",
        calls[0]
    );
    assert_eq!(calls[1], ApiCall::GetOperation(String::from("op-9")));
}

#[tokio::test]
async fn attaching_to_a_running_instance_surfaces_the_provider_error() {
    let api = ScriptedCompute::new();
    api.push_mutation(operation("op-10", OperationStatus::Pending));
    api.push_poll(failed_operation(
        "op-10",
        "RESOURCE_IN_USE",
        "instance must be stopped",
    ));
    let fleet = fast_fleet(api);
    let mut progress = Vec::new();

    let err = fleet
        .set_accelerator(&scope(), "vm1", GpuKind::V100, &mut progress)
        .await
        .expect_err("provider rejection should propagate");

    assert!(
        matches!(err, FleetError::Operation { ref message, .. }
            if message.contains("instance must be stopped")),
        "got {err}"
    );
}
