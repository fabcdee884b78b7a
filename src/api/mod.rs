//! Compute API seam: the trait the fleet commands drive.
//!
//! The provider's compute service is a black box behind [`ComputeApi`]; the
//! REST client implements it for production and scripted doubles implement
//! it in tests.

use std::future::Future;
use std::pin::Pin;

pub mod types;

use types::{Instance, MachineResourcesRequest, Operation};

/// Project and zone pair every API call is scoped to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ZoneScope {
    /// Project that owns the resources.
    pub project: String,
    /// Zone the resources live in.
    pub zone: String,
}

impl ZoneScope {
    /// Creates a scope from a project and zone.
    #[must_use]
    pub fn new(project: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            zone: zone.into(),
        }
    }
}

/// Future returned by API operations.
pub type ApiFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Minimal interface onto the provider's compute service.
///
/// Mutating calls return an [`Operation`] handle; completion is observed by
/// polling [`ComputeApi::get_operation`] until the status is terminal.
pub trait ComputeApi {
    /// Provider specific error type returned by the client.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches a single instance by name.
    fn get_instance<'a>(
        &'a self,
        scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Instance, Self::Error>;

    /// Lists all instances in the scope.
    fn list_instances<'a>(&'a self, scope: &'a ZoneScope)
    -> ApiFuture<'a, Vec<Instance>, Self::Error>;

    /// Requests that an instance be started.
    fn start_instance<'a>(
        &'a self,
        scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error>;

    /// Requests that an instance be stopped.
    fn stop_instance<'a>(
        &'a self,
        scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error>;

    /// Requests a change to the instance's attached machine resources.
    fn set_machine_resources<'a>(
        &'a self,
        scope: &'a ZoneScope,
        instance: &'a str,
        body: &'a MachineResourcesRequest,
    ) -> ApiFuture<'a, Operation, Self::Error>;

    /// Fetches the current status of a zone operation.
    fn get_operation<'a>(
        &'a self,
        scope: &'a ZoneScope,
        operation: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error>;
}
