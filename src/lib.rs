//! Core library for the Gantry fleet operator tool.
//!
//! The crate exposes a compute API seam ([`ComputeApi`]), a REST client
//! bound to it ([`GceClient`]), fleet commands built on asynchronous
//! operation polling ([`Fleet`]), and an idempotent SSH config synchroniser
//! ([`SshConfigFile`]).

pub mod api;
pub mod config;
pub mod fleet;
pub mod gce;
pub mod ssh_config;
pub mod test_support;

pub use api::types::{
    AccessConfig, GuestAccelerator, Instance, InstanceStatus, MachineResourcesRequest,
    NetworkInterface, Operation, OperationErrorDetail, OperationErrorPayload, OperationStatus,
};
pub use api::{ApiFuture, ComputeApi, ZoneScope};
pub use config::{ConfigError, GantryConfig};
pub use fleet::{Fleet, FleetError, GpuKind, UnknownGpu, instance_line};
pub use gce::{GceClient, GceError};
pub use ssh_config::{SshConfigError, SshConfigFile, expand_tilde};
