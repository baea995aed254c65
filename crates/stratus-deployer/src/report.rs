//! Console output of `setup` and `info`.

use std::fmt;

use crate::deployment::Tier;

const LOGIN_RULE: &str = "-------------------------------------------";
const INFO_RULE: &str = "-------------------------";

/// Public address of a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    /// VM name.
    pub server: String,
    /// Public IP, if the service assigned one.
    pub ip_address: Option<String>,
}

impl ServerAddress {
    fn address(&self) -> &str {
        self.ip_address.as_deref().unwrap_or("pending")
    }
}

/// Login block printed after a server is provisioned.
impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\n\nLogin information for {}\n{LOGIN_RULE}\nPublic IP      - {}\n",
            self.server,
            self.address()
        )
    }
}

/// Outcome of a successful `setup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentSummary {
    /// Resource group actually created.
    pub group: String,
    /// Topology.
    pub tier: Tier,
    /// One entry per webserver.
    pub logins: Vec<ServerAddress>,
    /// Public address of the load balancer (tier 3 only).
    pub load_balancer_ip: Option<String>,
}

impl fmt::Display for DeploymentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for login in &self.logins {
            write!(f, "{login}")?;
        }
        if let Some(ip) = &self.load_balancer_ip {
            write!(f, "\nLoad balancer  - {ip}\n")?;
        }
        write!(f, "\nResource group - {}\n", self.group)
    }
}

/// Description of an existing deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraReport {
    /// 3 if the group holds a load balancer, otherwise 2.
    pub tier: Tier,
    /// Webservers with a public address.
    pub servers: Vec<ServerAddress>,
}

impl fmt::Display for InfraReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Infrastructure details")?;
        writeln!(f, "{INFO_RULE}")?;
        writeln!(f, "Tier: {}", self.tier)?;
        for server in &self.servers {
            writeln!(f, "{} : {}", server.server, server.address())?;
        }
        Ok(())
    }
}
