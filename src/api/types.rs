//! Serde data model for the Compute Engine v1 wire format.
//!
//! Only the fields this tool reads or writes are modelled; unknown fields in
//! responses are ignored by serde's default behaviour.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status reported for an instance.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    /// Resources are being allocated.
    Provisioning,
    /// Resources acquired, instance is booting.
    Staging,
    /// Instance is booted and usable.
    Running,
    /// Instance is being stopped.
    Stopping,
    /// Instance is being suspended.
    Suspending,
    /// Instance is suspended.
    Suspended,
    /// Instance is undergoing provider-side repair.
    Repairing,
    /// Instance is stopped.
    Terminated,
    /// Any status this tool does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Provisioning => "PROVISIONING",
            Self::Staging => "STAGING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Suspending => "SUSPENDING",
            Self::Suspended => "SUSPENDED",
            Self::Repairing => "REPAIRING",
            Self::Terminated => "TERMINATED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

/// One external access configuration attached to a network interface.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AccessConfig {
    /// Externally routable NAT address, when one is assigned.
    #[serde(rename = "natIP", default, skip_serializing_if = "Option::is_none")]
    pub nat_ip: Option<String>,
}

/// A network interface and its access configurations.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    /// Access configurations, in the order returned by the service.
    #[serde(default)]
    pub access_configs: Vec<AccessConfig>,
}

/// A GPU accelerator attached to (or requested for) an instance.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestAccelerator {
    /// Full resource URL of the accelerator type.
    pub accelerator_type: String,
    /// Number of accelerators of this type.
    pub accelerator_count: u32,
}

impl GuestAccelerator {
    /// Short model name, e.g. `v100` for `.../acceleratorTypes/nvidia-tesla-v100`.
    #[must_use]
    pub fn model(&self) -> &str {
        let tail = self
            .accelerator_type
            .rsplit('/')
            .next()
            .unwrap_or(&self.accelerator_type);
        tail.rsplit('-').next().unwrap_or(tail)
    }
}

/// A compute instance as returned by the service.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Instance name, unique within its zone.
    pub name: String,
    /// Current lifecycle status.
    pub status: InstanceStatus,
    /// Full resource URL of the machine type.
    #[serde(default)]
    pub machine_type: String,
    /// Attached accelerators, if any.
    #[serde(default)]
    pub guest_accelerators: Vec<GuestAccelerator>,
    /// Network interfaces, in the order returned by the service.
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
}

impl Instance {
    /// Short machine type name, e.g. `n1-standard-8`.
    #[must_use]
    pub fn machine_type_short(&self) -> &str {
        self.machine_type
            .rsplit('/')
            .next()
            .unwrap_or(&self.machine_type)
    }

    /// All external addresses in interface-then-access-config order.
    #[must_use]
    pub fn external_ips(&self) -> impl Iterator<Item = &str> {
        self.network_interfaces
            .iter()
            .flat_map(|interface| interface.access_configs.iter())
            .filter_map(|access| access.nat_ip.as_deref())
    }

    /// First external address, or `None` when no interface has one
    /// (commonly because the instance is not running).
    #[must_use]
    pub fn external_ip(&self) -> Option<&str> {
        self.external_ips().next()
    }
}

/// Response envelope for the instance list call. An absent `items` field
/// means an empty fleet.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ListInstancesResponse {
    /// Instances in the requested zone.
    #[serde(default)]
    pub items: Vec<Instance>,
}

/// Request body for the `setMachineResources` call.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineResourcesRequest {
    /// Accelerators the instance should carry; empty detaches them all.
    pub guest_accelerators: Vec<GuestAccelerator>,
}

/// Status of an asynchronous zone operation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// Queued, not yet running.
    Pending,
    /// In progress.
    Running,
    /// Terminal; inspect the error payload to tell success from failure.
    Done,
    /// Any status this tool does not know about; treated as non-terminal.
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    /// Returns `true` once the operation can no longer change state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// One error entry attached to a failed operation.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OperationErrorDetail {
    /// Provider error code, e.g. `QUOTA_EXCEEDED`.
    #[serde(default)]
    pub code: String,
    /// Human-readable description from the provider.
    #[serde(default)]
    pub message: String,
}

/// Error payload attached to a finished operation.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct OperationErrorPayload {
    /// Individual error entries, in provider order.
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

impl OperationErrorPayload {
    /// Renders the payload as `code: message` pairs joined with `; `.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.errors.is_empty() {
            return String::from("operation reported an unspecified error");
        }
        self.errors
            .iter()
            .map(|detail| {
                if detail.code.is_empty() {
                    detail.message.clone()
                } else {
                    format!("{}: {}", detail.code, detail.message)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// An in-flight asynchronous mutation tracked by the service.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Operation {
    /// Operation name used for status polling.
    pub name: String,
    /// Current status.
    pub status: OperationStatus,
    /// Error payload, present only when the operation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationErrorPayload>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn interface(addresses: &[Option<&str>]) -> NetworkInterface {
        NetworkInterface {
            access_configs: addresses
                .iter()
                .map(|address| AccessConfig {
                    nat_ip: address.map(str::to_owned),
                })
                .collect(),
        }
    }

    fn instance_with_interfaces(interfaces: Vec<NetworkInterface>) -> Instance {
        Instance {
            name: String::from("vm1"),
            status: InstanceStatus::Running,
            machine_type: String::from(
                "https://www.googleapis.com/compute/v1/projects/p/zones/z/machineTypes/n1-standard-8",
            ),
            guest_accelerators: Vec::new(),
            network_interfaces: interfaces,
        }
    }

    #[test]
    fn external_ip_returns_first_in_interface_then_access_config_order() {
        let instance = instance_with_interfaces(vec![
            interface(&[None]),
            interface(&[None, Some("34.1.2.3"), Some("35.0.0.1")]),
            interface(&[Some("36.0.0.1")]),
        ]);
        assert_eq!(instance.external_ip(), Some("34.1.2.3"));
        let all: Vec<&str> = instance.external_ips().collect();
        assert_eq!(all, ["34.1.2.3", "35.0.0.1", "36.0.0.1"]);
    }

    #[test]
    fn external_ip_is_none_without_access_configs() {
        let instance = instance_with_interfaces(vec![interface(&[None]), interface(&[])]);
        assert_eq!(instance.external_ip(), None);
    }

    #[test]
    fn machine_type_short_takes_last_path_segment() {
        let instance = instance_with_interfaces(Vec::new());
        assert_eq!(instance.machine_type_short(), "n1-standard-8");
    }

    #[rstest]
    #[case("https://www.googleapis.com/compute/v1/projects/p/zones/z/acceleratorTypes/nvidia-tesla-v100", "v100")]
    #[case("nvidia-tesla-t4", "t4")]
    fn accelerator_model_takes_last_dash_segment(#[case] url: &str, #[case] expected: &str) {
        let accelerator = GuestAccelerator {
            accelerator_type: url.to_owned(),
            accelerator_count: 1,
        };
        assert_eq!(accelerator.model(), expected);
    }

    #[test]
    fn instance_decodes_from_wire_json() {
        let raw = r#"{
            "name": "vm1",
            "status": "TERMINATED",
            "machineType": "projects/p/zones/z/machineTypes/n1-standard-4",
            "guestAccelerators": [
                {"acceleratorType": "projects/p/zones/z/acceleratorTypes/nvidia-tesla-t4", "acceleratorCount": 1}
            ],
            "networkInterfaces": [
                {"accessConfigs": [{"natIP": "34.1.2.3", "type": "ONE_TO_ONE_NAT"}]}
            ]
        }"#;
        let instance: Instance = serde_json::from_str(raw).expect("instance should decode");
        assert_eq!(instance.status, InstanceStatus::Terminated);
        assert_eq!(instance.machine_type_short(), "n1-standard-4");
        assert_eq!(instance.external_ip(), Some("34.1.2.3"));
        assert_eq!(instance.guest_accelerators[0].model(), "t4");
    }

    #[test]
    fn unknown_statuses_decode_to_the_catch_all() {
        let operation: Operation =
            serde_json::from_str(r#"{"name": "op-1", "status": "HALTED"}"#)
                .expect("operation should decode");
        assert_eq!(operation.status, OperationStatus::Unknown);
        assert!(!operation.status.is_terminal());
    }

    #[test]
    fn operation_error_payload_describes_all_entries() {
        let payload = OperationErrorPayload {
            errors: vec![
                OperationErrorDetail {
                    code: String::from("QUOTA_EXCEEDED"),
                    message: String::from("no GPUs left"),
                },
                OperationErrorDetail {
                    code: String::new(),
                    message: String::from("try another zone"),
                },
            ],
        };
        assert_eq!(
            payload.describe(),
            "QUOTA_EXCEEDED: no GPUs left; try another zone"
        );
    }

    #[test]
    fn empty_operation_error_payload_still_describes_itself() {
        let payload = OperationErrorPayload::default();
        assert_eq!(payload.describe(), "operation reported an unspecified error");
    }
}
