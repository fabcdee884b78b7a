//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::api::types::{
    AccessConfig, GuestAccelerator, Instance, InstanceStatus, MachineResourcesRequest,
    NetworkInterface, Operation, OperationErrorDetail, OperationErrorPayload, OperationStatus,
};
use crate::api::{ApiFuture, ComputeApi, ZoneScope};

/// Error type returned by [`ScriptedCompute`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ScriptedComputeError {
    /// Failure injected by a test.
    #[error("scripted compute failure: {0}")]
    Scripted(String),
    /// Raised when a call arrives with no scripted response left.
    #[error("no scripted response available for {0}")]
    Exhausted(&'static str),
}

/// Records a single invocation made through [`ScriptedCompute`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ApiCall {
    /// Instance lookup for the named instance.
    GetInstance(String),
    /// Instance listing for the scope.
    ListInstances,
    /// Start request for the named instance.
    StartInstance(String),
    /// Stop request for the named instance.
    StopInstance(String),
    /// Machine-resources change with the requested body.
    SetMachineResources {
        /// Target instance name.
        instance: String,
        /// Requested accelerator set.
        body: MachineResourcesRequest,
    },
    /// Status query for the named operation.
    GetOperation(String),
}

type Scripted<T> = VecDeque<Result<T, ScriptedComputeError>>;

#[derive(Debug, Default)]
struct State {
    instances: Scripted<Instance>,
    listings: Scripted<Vec<Instance>>,
    mutations: Scripted<Operation>,
    polls: Scripted<Operation>,
    calls: Vec<ApiCall>,
}

/// Scripted compute API double returning pre-seeded responses in FIFO order.
///
/// Mutating calls (start, stop, machine-resources changes) share one
/// response queue; operation status polls have their own. Every invocation
/// is recorded for assertions.
#[derive(Clone, Debug, Default)]
pub struct ScriptedCompute {
    state: Arc<Mutex<State>>,
}

impl ScriptedCompute {
    /// Creates a double with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take<T>(queue: &mut Scripted<T>, call: &'static str) -> Result<T, ScriptedComputeError> {
        queue
            .pop_front()
            .unwrap_or_else(|| Err(ScriptedComputeError::Exhausted(call)))
    }

    /// Queues an instance lookup response.
    pub fn push_instance(&self, instance: Instance) {
        self.lock().instances.push_back(Ok(instance));
    }

    /// Queues an instance lookup failure.
    pub fn fail_instance(&self, message: &str) {
        self.lock()
            .instances
            .push_back(Err(ScriptedComputeError::Scripted(message.to_owned())));
    }

    /// Queues a listing response.
    pub fn push_listing(&self, instances: Vec<Instance>) {
        self.lock().listings.push_back(Ok(instances));
    }

    /// Queues a listing failure.
    pub fn fail_listing(&self, message: &str) {
        self.lock()
            .listings
            .push_back(Err(ScriptedComputeError::Scripted(message.to_owned())));
    }

    /// Queues a response for the next mutating call.
    pub fn push_mutation(&self, operation: Operation) {
        self.lock().mutations.push_back(Ok(operation));
    }

    /// Queues a failure for the next mutating call.
    pub fn fail_mutation(&self, message: &str) {
        self.lock()
            .mutations
            .push_back(Err(ScriptedComputeError::Scripted(message.to_owned())));
    }

    /// Queues an operation status poll response.
    pub fn push_poll(&self, operation: Operation) {
        self.lock().polls.push_back(Ok(operation));
    }

    /// Queues an operation status poll failure.
    pub fn fail_poll(&self, message: &str) {
        self.lock()
            .polls
            .push_back(Err(ScriptedComputeError::Scripted(message.to_owned())));
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }
}

impl ComputeApi for ScriptedCompute {
    type Error = ScriptedComputeError;

    fn get_instance<'a>(
        &'a self,
        _scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Instance, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(ApiCall::GetInstance(instance.to_owned()));
            Self::take(&mut state.instances, "instances.get")
        })
    }

    fn list_instances<'a>(
        &'a self,
        _scope: &'a ZoneScope,
    ) -> ApiFuture<'a, Vec<Instance>, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(ApiCall::ListInstances);
            Self::take(&mut state.listings, "instances.list")
        })
    }

    fn start_instance<'a>(
        &'a self,
        _scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(ApiCall::StartInstance(instance.to_owned()));
            Self::take(&mut state.mutations, "instances.start")
        })
    }

    fn stop_instance<'a>(
        &'a self,
        _scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(ApiCall::StopInstance(instance.to_owned()));
            Self::take(&mut state.mutations, "instances.stop")
        })
    }

    fn set_machine_resources<'a>(
        &'a self,
        _scope: &'a ZoneScope,
        instance: &'a str,
        body: &'a MachineResourcesRequest,
    ) -> ApiFuture<'a, Operation, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(ApiCall::SetMachineResources {
                instance: instance.to_owned(),
                body: body.clone(),
            });
            Self::take(&mut state.mutations, "instances.setMachineResources")
        })
    }

    fn get_operation<'a>(
        &'a self,
        _scope: &'a ZoneScope,
        operation: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error> {
        Box::pin(async move {
            let mut state = self.lock();
            state.calls.push(ApiCall::GetOperation(operation.to_owned()));
            Self::take(&mut state.polls, "zoneOperations.get")
        })
    }
}

/// Builds an instance with the given status and optional external address.
#[must_use]
pub fn instance(name: &str, status: InstanceStatus, external_ip: Option<&str>) -> Instance {
    Instance {
        name: name.to_owned(),
        status,
        machine_type: String::from(
            "https://www.googleapis.com/compute/v1/projects/proj-1/zones/zone-a/machineTypes/n1-standard-8",
        ),
        guest_accelerators: Vec::new(),
        network_interfaces: vec![NetworkInterface {
            access_configs: vec![AccessConfig {
                nat_ip: external_ip.map(str::to_owned),
            }],
        }],
    }
}

/// Builds an accelerator attachment for the named model.
#[must_use]
pub fn accelerator(model: &str, count: u32) -> GuestAccelerator {
    GuestAccelerator {
        accelerator_type: format!(
            "https://www.googleapis.com/compute/v1/projects/proj-1/zones/zone-a/acceleratorTypes/{model}"
        ),
        accelerator_count: count,
    }
}

/// Builds an operation in the given status with no error payload.
#[must_use]
pub fn operation(name: &str, status: OperationStatus) -> Operation {
    Operation {
        name: name.to_owned(),
        status,
        error: None,
    }
}

/// Builds a finished operation carrying one error entry.
#[must_use]
pub fn failed_operation(name: &str, code: &str, message: &str) -> Operation {
    Operation {
        name: name.to_owned(),
        status: OperationStatus::Done,
        error: Some(OperationErrorPayload {
            errors: vec![OperationErrorDetail {
                code: code.to_owned(),
                message: message.to_owned(),
            }],
        }),
    }
}
