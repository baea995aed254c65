//! Resource group models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stratus_core::types::ProvisioningState;

/// A resource group as returned by the management API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceGroup {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region the group metadata lives in.
    pub location: String,
    /// Resource tags.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    /// Server-populated properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ResourceGroupProperties>,
}

impl ResourceGroup {
    /// Request body for creating a group in `location`.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            location: location.into(),
            tags: HashMap::new(),
            properties: None,
        }
    }

    /// Provisioning state, when reported.
    #[must_use]
    pub fn provisioning_state(&self) -> Option<&ProvisioningState> {
        self.properties
            .as_ref()
            .and_then(|props| props.provisioning_state.as_ref())
    }
}

/// Resource group properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    /// Provisioning state of the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}
