//! Operation polling for mutating fleet commands.

use std::io::Write;
use std::time::Instant;

use tokio::time::sleep;

use crate::api::types::Operation;
use crate::api::{ComputeApi, ZoneScope};

use super::{Fleet, FleetError};

impl<C: ComputeApi> Fleet<C> {
    /// Polls a zone operation at the configured interval until it is done,
    /// then returns its final payload.
    ///
    /// A notice is written to `progress` when polling begins and when it
    /// completes. Non-terminal statuses (PENDING, RUNNING, or anything
    /// unrecognised) keep the loop alive; a failed status query aborts the
    /// wait immediately rather than being retried.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::Operation`] when the finished operation carries
    /// an error payload, [`FleetError::Timeout`] when the deadline passes,
    /// and [`FleetError::Api`] when a status query fails. The underlying
    /// mutation is never retried.
    pub async fn wait_for_operation<W: Write>(
        &self,
        scope: &ZoneScope,
        operation: &str,
        progress: &mut W,
    ) -> Result<Operation, FleetError<C::Error>> {
        writeln!(progress, "Waiting for operation {operation} to finish...").ok();
        let deadline = Instant::now() + self.wait_timeout;

        while Instant::now() <= deadline {
            let current = self
                .api
                .get_operation(scope, operation)
                .await
                .map_err(FleetError::Api)?;

            if current.status.is_terminal() {
                if let Some(error) = &current.error {
                    return Err(FleetError::Operation {
                        operation: operation.to_owned(),
                        message: error.describe(),
                    });
                }
                writeln!(progress, "done.").ok();
                return Ok(current);
            }

            sleep(self.poll_interval).await;
        }

        Err(FleetError::Timeout {
            operation: operation.to_owned(),
            seconds: self.wait_timeout.as_secs(),
        })
    }
}
