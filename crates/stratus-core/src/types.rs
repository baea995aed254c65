//! Shared management-API types.
//!
//! Service enumeration, API versions, list envelopes and provisioning states used by
//! every client crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// API version used for resource group requests.
pub const RESOURCES_API_VERSION: &str = "2021-04-01";

/// API version used for network requests.
pub const NETWORK_API_VERSION: &str = "2023-09-01";

/// API version used for compute requests.
pub const COMPUTE_API_VERSION: &str = "2023-09-01";

/// Remote services the Stratus tools talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    /// Resource group management
    Resources,
    /// Network management
    Network,
    /// Compute management
    Compute,
    /// Document database
    DocumentDb,
    /// Hosted language model
    LanguageModel,
    /// Weather data provider
    Weather,
}

impl Service {
    /// Returns the service name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Network => "network",
            Self::Compute => "compute",
            Self::DocumentDb => "document-db",
            Self::LanguageModel => "language-model",
            Self::Weather => "weather",
        }
    }

    /// Returns all services.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Resources,
            Self::Network,
            Self::Compute,
            Self::DocumentDb,
            Self::LanguageModel,
            Self::Weather,
        ]
    }

    /// Returns true for the cloud management services.
    #[must_use]
    pub const fn is_management(&self) -> bool {
        matches!(self, Self::Resources | Self::Network | Self::Compute)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Paged list envelope returned by management list operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    /// Absolute URL of the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

/// Provisioning state reported on management resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProvisioningState {
    /// Resource was created or updated
    Succeeded,
    /// Resource creation failed
    Failed,
    /// Operation was cancelled
    Canceled,
    /// Resource is being created
    Creating,
    /// Resource is being updated
    Updating,
    /// Resource is being deleted
    Deleting,
    /// Any state this crate does not model
    #[serde(other)]
    Unknown,
}

impl ProvisioningState {
    /// Returns true once no further transition is expected.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

/// Reference to another resource by ID.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubResource {
    /// Full resource ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SubResource {
    /// Reference the resource with the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}
