//! Compute Engine REST implementation of the compute API seam.

mod error;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::api::types::{Instance, ListInstancesResponse, MachineResourcesRequest, Operation};
use crate::api::{ApiFuture, ComputeApi, ZoneScope};
use crate::config::GantryConfig;

pub use error::GceError;

/// REST client for the Compute Engine v1 API.
///
/// Authenticates every call with a bearer token supplied through
/// configuration; token acquisition and refresh are outside this tool.
#[derive(Clone, Debug)]
pub struct GceClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

/// Error envelope returned by the service on non-success statuses.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl GceClient {
    /// Constructs a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GceError::Config`] when the provided configuration fails
    /// validation.
    pub fn new(config: &GantryConfig) -> Result<Self, GceError> {
        config
            .validate()
            .map_err(|err| GceError::Config(err.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.api_endpoint.trim_end_matches('/').to_owned(),
            access_token: config.access_token.clone(),
        })
    }

    fn zone_url(&self, scope: &ZoneScope) -> String {
        format!(
            "{}/projects/{}/zones/{}",
            self.base_url, scope.project, scope.zone
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, GceError> {
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, url: String) -> Result<T, GceError> {
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, GceError> {
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
            .ok()
            .and_then(|envelope| envelope.error)
            .map_or(text, |body| body.message);
        Err(GceError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

impl ComputeApi for GceClient {
    type Error = GceError;

    fn get_instance<'a>(
        &'a self,
        scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Instance, Self::Error> {
        Box::pin(async move {
            self.get_json(format!("{}/instances/{instance}", self.zone_url(scope)))
                .await
        })
    }

    fn list_instances<'a>(
        &'a self,
        scope: &'a ZoneScope,
    ) -> ApiFuture<'a, Vec<Instance>, Self::Error> {
        Box::pin(async move {
            let response: ListInstancesResponse = self
                .get_json(format!("{}/instances", self.zone_url(scope)))
                .await?;
            Ok(response.items)
        })
    }

    fn start_instance<'a>(
        &'a self,
        scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error> {
        Box::pin(async move {
            self.post_empty(format!("{}/instances/{instance}/start", self.zone_url(scope)))
                .await
        })
    }

    fn stop_instance<'a>(
        &'a self,
        scope: &'a ZoneScope,
        instance: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error> {
        Box::pin(async move {
            self.post_empty(format!("{}/instances/{instance}/stop", self.zone_url(scope)))
                .await
        })
    }

    fn set_machine_resources<'a>(
        &'a self,
        scope: &'a ZoneScope,
        instance: &'a str,
        body: &'a MachineResourcesRequest,
    ) -> ApiFuture<'a, Operation, Self::Error> {
        Box::pin(async move {
            self.post_json(
                format!(
                    "{}/instances/{instance}/setMachineResources",
                    self.zone_url(scope)
                ),
                body,
            )
            .await
        })
    }

    fn get_operation<'a>(
        &'a self,
        scope: &'a ZoneScope,
        operation: &'a str,
    ) -> ApiFuture<'a, Operation, Self::Error> {
        Box::pin(async move {
            self.get_json(format!("{}/operations/{operation}", self.zone_url(scope)))
                .await
        })
    }
}
