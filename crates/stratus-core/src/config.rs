//! Environment-driven cloud configuration.
//!
//! The deployer reads its subscription and region from the environment; the values are
//! validated once at startup. Both binaries first merge an optional `.env` file into
//! the process environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;
use validator::Validate;

use crate::Error;

/// Environment variable holding the subscription ID
pub const SUBSCRIPTION_ID_VAR: &str = "SUBSCRIPTION_ID";
/// Environment variable holding the deployment region
pub const LOCATION_VAR: &str = "LOCATION";
/// Environment variable overriding the management endpoint
pub const MANAGEMENT_ENDPOINT_VAR: &str = "MANAGEMENT_ENDPOINT";

/// Environment file read at startup
pub const ENV_FILE: &str = ".env";

/// Default deployment region
pub const DEFAULT_LOCATION: &str = "southafricanorth";
/// Default management endpoint
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com/";

/// Subscription, region and endpoint the management clients target.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CloudConfig {
    /// Subscription all resources are created in
    #[validate(length(min = 1, message = "subscription ID must not be empty"))]
    pub subscription_id: String,

    /// Region new resources are placed in
    #[validate(length(min = 1, message = "location must not be empty"))]
    #[serde(default = "default_location")]
    pub location: String,

    /// Management REST endpoint
    #[validate(url)]
    #[serde(default = "default_management_endpoint")]
    pub management_endpoint: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_management_endpoint() -> String {
    DEFAULT_MANAGEMENT_ENDPOINT.to_string()
}

impl CloudConfig {
    /// Create a configuration for `subscription_id` with default location and endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn new(subscription_id: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            subscription_id: subscription_id.into(),
            location: default_location(),
            management_endpoint: default_management_endpoint(),
        };
        config.checked()
    }

    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `SUBSCRIPTION_ID` is missing or validation fails.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription is missing or validation fails.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let subscription_id = non_empty(SUBSCRIPTION_ID_VAR).ok_or_else(|| {
            Error::ConfigError(format!("{SUBSCRIPTION_ID_VAR} must be set"))
        })?;

        let config = Self {
            subscription_id,
            location: non_empty(LOCATION_VAR).unwrap_or_else(default_location),
            management_endpoint: non_empty(MANAGEMENT_ENDPOINT_VAR)
                .unwrap_or_else(default_management_endpoint),
        };
        config.checked()
    }

    /// Set the deployment region.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the management endpoint.
    #[must_use]
    pub fn with_management_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.management_endpoint = endpoint.into();
        self
    }

    /// Parse the management endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_management_endpoint(&self) -> Result<Url, Error> {
        Url::parse(&self.management_endpoint)
            .map_err(|e| Error::ConfigError(format!("Invalid management endpoint: {e}")))
    }

    fn checked(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }
}

/// Outcome of [`load_env_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    /// Variables were merged from this file
    Loaded(PathBuf),
    /// No file at this path; only the process environment is used
    Missing(PathBuf),
}

impl EnvFile {
    /// Report the outcome through `tracing`.
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => {
                info!("Environment variables loaded successfully from {}", path.display());
            }
            Self::Missing(path) => {
                warn!("No environment file at {}; using the process environment", path.display());
            }
        }
    }
}

/// Merge the variables of `path` into the process environment.
///
/// Variables already set in the process win over the file.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<EnvFile, Error> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(EnvFile::Loaded(path.to_path_buf())),
        Err(err) if err.not_found() => Ok(EnvFile::Missing(path.to_path_buf())),
        Err(err) => Err(Error::ConfigError(format!(
            "Failed to load environment variables from {}: {err}",
            path.display()
        ))),
    }
}
