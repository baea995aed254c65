//! Management resource identifiers.
//!
//! A resource ID has the shape
//! `/subscriptions/{sub}/resourceGroups/{group}/providers/{namespace}/{type}/{name}`
//! with an optional `/{child_type}/{child_name}` suffix. [`ResourceId`] builds these for
//! the resource kinds the deployer uses and parses the IDs returned by the service.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Network resource provider namespace
pub const NETWORK_NAMESPACE: &str = "Microsoft.Network";
/// Compute resource provider namespace
pub const COMPUTE_NAMESPACE: &str = "Microsoft.Compute";

/// Parsed or constructed management resource ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    subscription: String,
    resource_group: String,
    namespace: String,
    resource_type: String,
    name: String,
    child: Option<(String, String)>,
}

/// Generates constructors for top-level resource kinds.
macro_rules! top_level_kind {
    ($(#[$meta:meta])* $fn_name:ident, $namespace:expr, $resource_type:expr) => {
        $(#[$meta])*
        #[must_use]
        pub fn $fn_name(subscription: &str, group: &str, name: &str) -> Self {
            Self::new(subscription, group, $namespace, $resource_type, name)
        }
    };
}

/// Generates constructors for child resource kinds.
macro_rules! child_kind {
    ($(#[$meta:meta])* $fn_name:ident, $namespace:expr, $parent_type:expr, $child_type:expr) => {
        $(#[$meta])*
        #[must_use]
        pub fn $fn_name(subscription: &str, group: &str, parent: &str, name: &str) -> Self {
            Self::new(subscription, group, $namespace, $parent_type, parent)
                .with_child($child_type, name)
        }
    };
}

impl ResourceId {
    /// Build a top-level resource ID.
    #[must_use]
    pub fn new(
        subscription: &str,
        group: &str,
        namespace: &str,
        resource_type: &str,
        name: &str,
    ) -> Self {
        Self {
            subscription: subscription.to_string(),
            resource_group: group.to_string(),
            namespace: namespace.to_string(),
            resource_type: resource_type.to_string(),
            name: name.to_string(),
            child: None,
        }
    }

    /// Turn this ID into the ID of a child resource.
    #[must_use]
    pub fn with_child(mut self, child_type: &str, child_name: &str) -> Self {
        self.child = Some((child_type.to_string(), child_name.to_string()));
        self
    }

    top_level_kind!(
        /// Virtual network ID.
        virtual_network, NETWORK_NAMESPACE, "virtualNetworks"
    );
    top_level_kind!(
        /// Network security group ID.
        network_security_group, NETWORK_NAMESPACE, "networkSecurityGroups"
    );
    top_level_kind!(
        /// Public IP address ID.
        public_ip_address, NETWORK_NAMESPACE, "publicIPAddresses"
    );
    top_level_kind!(
        /// Network interface ID.
        network_interface, NETWORK_NAMESPACE, "networkInterfaces"
    );
    top_level_kind!(
        /// Load balancer ID.
        load_balancer, NETWORK_NAMESPACE, "loadBalancers"
    );
    top_level_kind!(
        /// Virtual machine ID.
        virtual_machine, COMPUTE_NAMESPACE, "virtualMachines"
    );
    child_kind!(
        /// Subnet ID inside a virtual network.
        subnet, NETWORK_NAMESPACE, "virtualNetworks", "subnets"
    );
    child_kind!(
        /// Frontend IP configuration ID inside a load balancer.
        frontend_ip_configuration, NETWORK_NAMESPACE, "loadBalancers", "frontendIPConfigurations"
    );
    child_kind!(
        /// Backend address pool ID inside a load balancer.
        backend_address_pool, NETWORK_NAMESPACE, "loadBalancers", "backendAddressPools"
    );
    child_kind!(
        /// Health probe ID inside a load balancer.
        probe, NETWORK_NAMESPACE, "loadBalancers", "probes"
    );

    /// Subscription the resource lives in.
    #[must_use]
    pub fn subscription(&self) -> &str {
        &self.subscription
    }

    /// Resource group the resource lives in.
    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Provider namespace, e.g. `Microsoft.Network`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Top-level resource type, e.g. `virtualNetworks`.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Name of the resource the ID points at (the child name for child resources).
    #[must_use]
    pub fn name(&self) -> &str {
        self.child
            .as_ref()
            .map_or(self.name.as_str(), |(_, name)| name.as_str())
    }

    /// Name of the top-level parent resource.
    #[must_use]
    pub fn parent_name(&self) -> &str {
        &self.name
    }

    /// Path relative to the management endpoint (no leading slash).
    #[must_use]
    pub fn path(&self) -> String {
        self.to_string().trim_start_matches('/').to_string()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
            self.subscription, self.resource_group, self.namespace, self.resource_type, self.name
        )?;
        if let Some((child_type, child_name)) = &self.child {
            write!(f, "/{child_type}/{child_name}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::ValidationError(format!("Invalid resource ID: {s}"));
        let segments: Vec<&str> = s.trim_matches('/').split('/').collect();

        if segments.len() != 8 && segments.len() != 10 {
            return Err(invalid());
        }
        if !segments[0].eq_ignore_ascii_case("subscriptions")
            || !segments[2].eq_ignore_ascii_case("resourceGroups")
            || !segments[4].eq_ignore_ascii_case("providers")
            || segments.iter().any(|segment| segment.is_empty())
        {
            return Err(invalid());
        }

        let mut id = Self::new(
            segments[1],
            segments[3],
            segments[5],
            segments[6],
            segments[7],
        );
        if segments.len() == 10 {
            id = id.with_child(segments[8], segments[9]);
        }
        Ok(id)
    }
}
