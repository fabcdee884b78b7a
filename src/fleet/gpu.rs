//! GPU accelerator selection and its provider mapping.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::api::ZoneScope;
use crate::api::types::{GuestAccelerator, MachineResourcesRequest};

/// Closed set of accelerator choices the tool knows how to request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GpuKind {
    /// NVIDIA Tesla V100.
    V100,
    /// NVIDIA Tesla T4.
    T4,
    /// No accelerator; detaches whatever is attached.
    None,
}

/// Error raised when a GPU token is not one of the recognised values.
///
/// This is a configuration error detected before any API call.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unrecognised GPU '{0}'; expected one of v100, t4, none")]
pub struct UnknownGpu(String);

impl GpuKind {
    /// Provider accelerator type name, or `None` for the detach request.
    #[must_use]
    pub const fn accelerator_type(self) -> Option<&'static str> {
        match self {
            Self::V100 => Some("nvidia-tesla-v100"),
            Self::T4 => Some("nvidia-tesla-t4"),
            Self::None => None,
        }
    }

    /// Builds the machine-resources body requesting this accelerator.
    ///
    /// `none` maps to an empty accelerator list, which detaches. Otherwise
    /// the body carries a single accelerator with the zone-scoped type URL.
    #[must_use]
    pub fn machine_resources(self, scope: &ZoneScope) -> MachineResourcesRequest {
        let guest_accelerators = self.accelerator_type().map_or_else(Vec::new, |kind| {
            vec![GuestAccelerator {
                accelerator_type: format!(
                    "https://www.googleapis.com/compute/v1/projects/{}/zones/{}/acceleratorTypes/{kind}",
                    scope.project, scope.zone
                ),
                accelerator_count: 1,
            }]
        });
        MachineResourcesRequest { guest_accelerators }
    }
}

impl FromStr for GpuKind {
    type Err = UnknownGpu;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "v100" => Ok(Self::V100),
            "t4" => Ok(Self::T4),
            "none" => Ok(Self::None),
            _ => Err(UnknownGpu(value.to_owned())),
        }
    }
}

impl fmt::Display for GpuKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::V100 => "v100",
            Self::T4 => "t4",
            Self::None => "none",
        };
        f.write_str(label)
    }
}
