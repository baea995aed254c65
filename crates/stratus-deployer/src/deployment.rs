//! Deployment requests.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use stratus_core::validation::{
    validate_admin_password, validate_admin_username, validate_group_name,
    validate_resource_name,
};

use crate::naming::DeploymentNames;
use crate::Result;

/// Maximum number of webservers behind a load balancer.
pub const MAX_WEBSERVERS: u8 = 10;

/// Deployment topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Tier {
    /// One webserver and a database server.
    #[value(name = "2")]
    Two,
    /// Several webservers behind a load balancer and a database server.
    #[value(name = "3")]
    Three,
}

impl Tier {
    /// Tier number as printed by `info`.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Whether the topology includes a load balancer.
    #[must_use]
    pub const fn has_load_balancer(self) -> bool {
        matches!(self, Self::Three)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Administrator account created on every VM.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: SecretString,
}

impl AdminCredentials {
    /// Validate and wrap the administrator account.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the username or password is not accepted by the
    /// compute service.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        validate_admin_username(&username)?;
        validate_admin_password(&password)?;
        Ok(Self {
            username,
            password: SecretString::from(password),
        })
    }

    /// Administrator login.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Administrator password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Everything `setup` needs to provision a deployment.
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    /// Requested resource group name (a suffix is appended if it is taken).
    pub group: String,
    /// Topology.
    pub tier: Tier,
    /// Number of webservers; always 1 for tier 2.
    pub webservers: u8,
    /// VM administrator account.
    pub admin: AdminCredentials,
}

impl DeploymentPlan {
    /// Build a validated plan.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid group name or webserver count, or
    /// when a resource named after the group would be rejected.
    pub fn new(group: &str, tier: Tier, webservers: u8, admin: AdminCredentials) -> Result<Self> {
        let group = validate_group_name(group)?;
        validate_derived_names(&group, tier)?;

        if tier == Tier::Three && !(1..=MAX_WEBSERVERS).contains(&webservers) {
            return Err(stratus_core::Error::ValidationError(format!(
                "Number of webservers must be between 1 and {MAX_WEBSERVERS}"
            )));
        }
        let webservers = match tier {
            Tier::Two => 1,
            Tier::Three => webservers,
        };
        Ok(Self {
            group,
            tier,
            webservers,
            admin,
        })
    }
}

/// Check the names of the resources a `tier` deployment creates after `group`.
///
/// # Errors
///
/// Returns a validation error naming the first resource that would be rejected.
pub fn validate_derived_names(group: &str, tier: Tier) -> Result<()> {
    let names = DeploymentNames::new(group);
    let mut derived = vec![names.vnet(), names.subnet(), names.nsg()];
    if tier.has_load_balancer() {
        derived.push(names.backend_pool());
    }
    derived
        .iter()
        .try_for_each(|name| validate_resource_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminCredentials {
        AdminCredentials::new("deployops", "Sup3rSecret!!").unwrap()
    }

    #[test]
    fn tier_two_uses_single_webserver() {
        let plan = DeploymentPlan::new(" shop ", Tier::Two, 5, admin()).unwrap();
        assert_eq!(plan.group, "shop");
        assert_eq!(plan.webservers, 1);
    }

    #[test]
    fn tier_three_bounds() {
        assert!(DeploymentPlan::new("shop", Tier::Three, 0, admin()).is_err());
        assert!(DeploymentPlan::new("shop", Tier::Three, 11, admin()).is_err());
        assert_eq!(
            DeploymentPlan::new("shop", Tier::Three, 4, admin())
                .unwrap()
                .webservers,
            4
        );
    }

    #[test]
    fn invalid_group_rejected() {
        assert!(DeploymentPlan::new("bad name.", Tier::Two, 1, admin()).is_err());
    }

    #[test]
    fn group_must_yield_valid_resource_names() {
        // Parentheses are fine in a group name but not in a VNet name.
        assert!(DeploymentPlan::new("shop(eu)", Tier::Two, 1, admin()).is_err());
        assert!(DeploymentPlan::new("_shop", Tier::Two, 1, admin()).is_err());

        let long = "a".repeat(70);
        assert!(DeploymentPlan::new(&long, Tier::Two, 1, admin()).is_ok());
        assert!(DeploymentPlan::new(&long, Tier::Three, 2, admin()).is_err());
    }

    #[test]
    fn derived_names_depend_on_tier() {
        let group = "a".repeat(72);
        assert!(validate_derived_names(&group, Tier::Two).is_ok());
        let err = validate_derived_names(&group, Tier::Three).unwrap_err();
        assert!(err.to_string().contains("_lb_addr_pool"));

        let suffixed = format!("{}-2f6ed", "a".repeat(70));
        assert!(validate_derived_names(&suffixed, Tier::Two).is_err());
    }

    #[test]
    fn credentials_are_validated_and_redacted() {
        assert!(AdminCredentials::new("admin", "Sup3rSecret!!").is_err());
        assert!(AdminCredentials::new("deployops", "short").is_err());
        let rendered = format!("{:?}", admin());
        assert!(!rendered.contains("Sup3rSecret"));
        assert_eq!(admin().password(), "Sup3rSecret!!");
    }

    #[test]
    fn tier_display() {
        assert_eq!(Tier::Two.to_string(), "2");
        assert!(Tier::Three.has_load_balancer());
    }
}
