//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::api::ZoneScope;

/// Gantry configuration derived from environment variables, configuration
/// files, and defaults.
///
/// The project and zone deliberately have no compiled-in defaults: they are
/// supplied here and may be overridden per invocation with the global
/// `--project-id` / `--zone` flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "GANTRY")]
pub struct GantryConfig {
    /// Project that owns the fleet. Required.
    pub project_id: String,
    /// Zone the fleet lives in. Required.
    pub zone: String,
    /// OAuth2 bearer token presented to the compute service. Required;
    /// obtaining the token (for example from `gcloud auth
    /// print-access-token`) is the operator's concern.
    pub access_token: String,
    /// Base URL of the compute service.
    #[ortho_config(default = "https://compute.googleapis.com/compute/v1".to_owned())]
    pub api_endpoint: String,
    /// SSH client configuration file kept in sync by the `ssh` subcommand.
    /// A leading `~/` is expanded to the user's home directory at use.
    #[ortho_config(default = "~/.ssh/config".to_owned())]
    pub ssh_config_path: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

impl GantryConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to gantry.toml",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration using the `ortho-config` derive. Values merge
    /// defaults, configuration files, environment variables, and CLI flags in
    /// that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the loader fails to merge sources.
    pub fn load_from_sources() -> Result<Self, ConfigError> {
        Self::load().map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("gantry")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Effective scope for one invocation: configured project and zone with
    /// optional per-run overrides applied.
    #[must_use]
    pub fn scope(&self, project_override: Option<&str>, zone_override: Option<&str>) -> ZoneScope {
        ZoneScope::new(
            project_override.unwrap_or(&self.project_id),
            zone_override.unwrap_or(&self.zone),
        )
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values via environment variables or
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.project_id,
            &FieldMetadata::new("project ID", "GANTRY_PROJECT_ID", "project_id"),
        )?;
        Self::require_field(
            &self.zone,
            &FieldMetadata::new("zone", "GANTRY_ZONE", "zone"),
        )?;
        Self::require_field(
            &self.access_token,
            &FieldMetadata::new("API access token", "GANTRY_ACCESS_TOKEN", "access_token"),
        )?;
        Self::require_field(
            &self.api_endpoint,
            &FieldMetadata::new("API endpoint", "GANTRY_API_ENDPOINT", "api_endpoint"),
        )?;
        Self::require_field(
            &self.ssh_config_path,
            &FieldMetadata::new(
                "SSH config path",
                "GANTRY_SSH_CONFIG_PATH",
                "ssh_config_path",
            ),
        )?;
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
