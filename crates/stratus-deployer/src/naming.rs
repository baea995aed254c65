//! Resource names derived from a deployment name.
//!
//! Every resource of a deployment is named after the resource group, so `info` and
//! `teardown` can find them again from the group name alone.

/// Prefix shared by all webservers.
pub const WEBSERVER_PREFIX: &str = "webserver";
/// Name of the database server.
pub const DBSERVER_NAME: &str = "dbserver";
/// Name of the load balancer health probe.
pub const PROBE_NAME: &str = "lb_healthprobe";
/// Suffix of public IP resources.
pub const PUBLIC_IP_SUFFIX: &str = "_ip";

/// Names of the resources inside one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentNames {
    group: String,
}

impl DeploymentNames {
    /// Names for the deployment living in `group`.
    #[must_use]
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }

    /// Resource group name.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Virtual network name.
    #[must_use]
    pub fn vnet(&self) -> String {
        format!("{}_vnet", self.group)
    }

    /// Subnet name.
    #[must_use]
    pub fn subnet(&self) -> String {
        format!("{}_subnet", self.group)
    }

    /// Network security group name.
    #[must_use]
    pub fn nsg(&self) -> String {
        format!("{}_nsg", self.group)
    }

    /// Name of webserver `index`.
    #[must_use]
    pub fn webserver(index: u8) -> String {
        format!("{WEBSERVER_PREFIX}{index}")
    }

    /// Public IP name of a server.
    #[must_use]
    pub fn public_ip(server: &str) -> String {
        format!("{server}{PUBLIC_IP_SUFFIX}")
    }

    /// NIC name of a server.
    #[must_use]
    pub fn interface(server: &str) -> String {
        format!("{server}_interface")
    }

    /// IP configuration name inside a server's NIC.
    #[must_use]
    pub fn ip_configuration(server: &str) -> String {
        format!("{server}_ipconfig")
    }

    /// Load balancer name.
    #[must_use]
    pub fn load_balancer(&self) -> String {
        format!("{}_lb", self.group)
    }

    /// Load balancer public IP name.
    #[must_use]
    pub fn load_balancer_ip(&self) -> String {
        Self::public_ip(&self.load_balancer())
    }

    /// Load balancer frontend configuration name.
    #[must_use]
    pub fn frontend(&self) -> String {
        format!("{}_fip", self.load_balancer())
    }

    /// Load balancer backend pool name.
    #[must_use]
    pub fn backend_pool(&self) -> String {
        format!("{}_addr_pool", self.load_balancer())
    }

    /// Load balancing rule name.
    #[must_use]
    pub fn rule(&self) -> String {
        format!("{}_rule", self.load_balancer())
    }
}

/// Server name owning a public IP resource, if the name follows the convention.
#[must_use]
pub fn server_for_public_ip(ip_name: &str) -> Option<&str> {
    ip_name.strip_suffix(PUBLIC_IP_SUFFIX)
}
