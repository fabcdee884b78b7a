//! Fleet commands: list, start, stop, accelerator changes, SSH config sync.
//!
//! [`Fleet`] is generic over the [`ComputeApi`] seam so commands run
//! unchanged against the REST client in production and scripted doubles in
//! tests. Execution is strictly sequential: one command per invocation, the
//! only suspension point is the operation polling loop.

mod gpu;
#[cfg(test)]
mod tests;
mod wait;

use std::io::Write;
use std::time::Duration;

use thiserror::Error;

use crate::api::types::Instance;
use crate::api::{ComputeApi, ZoneScope};
use crate::ssh_config::{SshConfigError, SshConfigFile};

pub use gpu::{GpuKind, UnknownGpu};

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Errors surfaced while driving fleet commands.
#[derive(Debug, Error)]
pub enum FleetError<ApiError>
where
    ApiError: std::error::Error + 'static,
{
    /// Raised when a compute API call fails (connectivity, auth, quota, or a
    /// provider-side rejection of the request).
    #[error("compute API request failed: {0}")]
    Api(#[source] ApiError),
    /// Raised when a finished operation carries an error payload. The
    /// mutation is never retried.
    #[error("operation {operation} failed: {message}")]
    Operation {
        /// Operation name reported by the service.
        operation: String,
        /// Error payload rendered as code/message pairs.
        message: String,
    },
    /// Raised when an operation does not finish within the wait timeout.
    #[error("operation {operation} did not finish within {seconds} seconds")]
    Timeout {
        /// Operation name being waited on.
        operation: String,
        /// Configured wait bound in seconds.
        seconds: u64,
    },
    /// Raised when an instance has no externally routable address.
    #[error("instance {instance} has no external IP; is it running?")]
    MissingExternalAddress {
        /// Instance that was targeted.
        instance: String,
    },
    /// Raised when the SSH config file cannot be updated.
    #[error("failed to update SSH config: {0}")]
    SshConfig(#[source] SshConfigError),
}

/// Drives the instance commands against a compute API implementation.
#[derive(Clone, Debug)]
pub struct Fleet<C: ComputeApi> {
    api: C,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl<C: ComputeApi> Fleet<C> {
    /// Creates a fleet handle with the default polling cadence.
    #[must_use]
    pub const fn new(api: C) -> Self {
        Self {
            api,
            poll_interval: POLL_INTERVAL,
            wait_timeout: WAIT_TIMEOUT,
        }
    }

    /// Overrides the operation polling interval.
    ///
    /// This is primarily used by tests to keep polling scenarios fast.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Overrides the operation wait timeout.
    ///
    /// This is primarily used by tests to keep timeout scenarios fast.
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Writes one line per instance in scope. An empty fleet writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Api`] when the listing call fails.
    pub async fn list<W: Write>(
        &self,
        scope: &ZoneScope,
        out: &mut W,
    ) -> Result<(), FleetError<C::Error>> {
        let instances = self
            .api
            .list_instances(scope)
            .await
            .map_err(FleetError::Api)?;
        for entry in &instances {
            writeln!(out, "{}", instance_line(entry)).ok();
        }
        Ok(())
    }

    /// Starts an instance and waits for the operation to finish.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Api`] when the start call fails, plus any error
    /// from [`Fleet::wait_for_operation`].
    pub async fn start<W: Write>(
        &self,
        scope: &ZoneScope,
        instance: &str,
        progress: &mut W,
    ) -> Result<(), FleetError<C::Error>> {
        let operation = self
            .api
            .start_instance(scope, instance)
            .await
            .map_err(FleetError::Api)?;
        self.wait_for_operation(scope, &operation.name, progress)
            .await?;
        Ok(())
    }

    /// Stops an instance and waits for the operation to finish.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Api`] when the stop call fails, plus any error
    /// from [`Fleet::wait_for_operation`].
    pub async fn stop<W: Write>(
        &self,
        scope: &ZoneScope,
        instance: &str,
        progress: &mut W,
    ) -> Result<(), FleetError<C::Error>> {
        let operation = self
            .api
            .stop_instance(scope, instance)
            .await
            .map_err(FleetError::Api)?;
        self.wait_for_operation(scope, &operation.name, progress)
            .await?;
        Ok(())
    }

    /// Reconfigures the instance's accelerator and waits for the operation.
    ///
    /// The instance's current state is not pre-checked; the service rejects
    /// reconfiguration of a running instance and that error is surfaced
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Api`] when the reconfiguration call fails, plus
    /// any error from [`Fleet::wait_for_operation`].
    pub async fn set_accelerator<W: Write>(
        &self,
        scope: &ZoneScope,
        instance: &str,
        gpu: GpuKind,
        progress: &mut W,
    ) -> Result<(), FleetError<C::Error>> {
        let body = gpu.machine_resources(scope);
        let operation = self
            .api
            .set_machine_resources(scope, instance, &body)
            .await
            .map_err(FleetError::Api)?;
        self.wait_for_operation(scope, &operation.name, progress)
            .await?;
        Ok(())
    }

    /// Resolves the instance's external address and rewrites the SSH config
    /// to carry exactly one up-to-date block for it.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Api`] when the instance lookup fails,
    /// [`FleetError::MissingExternalAddress`] when no interface carries an
    /// external address, and [`FleetError::SshConfig`] when the file cannot
    /// be rewritten.
    pub async fn sync_ssh<W: Write>(
        &self,
        scope: &ZoneScope,
        instance: &str,
        ssh: &SshConfigFile,
        out: &mut W,
    ) -> Result<(), FleetError<C::Error>> {
        let details = self
            .api
            .get_instance(scope, instance)
            .await
            .map_err(FleetError::Api)?;
        let address = details
            .external_ip()
            .ok_or_else(|| FleetError::MissingExternalAddress {
                instance: instance.to_owned(),
            })?;
        ssh.update(instance, address).map_err(FleetError::SshConfig)?;
        writeln!(out, "Host {instance} has been added to {}", ssh.path()).ok();
        Ok(())
    }
}

/// Renders one listing line for an instance: name, status, machine type,
/// accelerators as `model*count`, and every external address.
#[must_use]
pub fn instance_line(instance: &Instance) -> String {
    use std::fmt::Write as _;

    let mut line = format!(
        " - {}, {}, {}",
        instance.name,
        instance.status,
        instance.machine_type_short()
    );
    for accelerator in &instance.guest_accelerators {
        write!(line, ", {}*{}", accelerator.model(), accelerator.accelerator_count).ok();
    }
    for address in instance.external_ips() {
        write!(line, ", {address}").ok();
    }
    line
}
