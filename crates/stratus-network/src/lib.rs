//! Network management client and data models.
//!
//! Provides typed structures and an asynchronous client for virtual networks, subnets,
//! network security groups, public IP addresses, network interfaces and load balancers.

#![deny(missing_docs)]

pub mod client;
pub mod models;

pub use client::{NetworkClient, NetworkClientBuilder};
pub use models::{
    AddressSpace, BackendAddressPool, FrontendIpConfiguration, IpConfiguration, LoadBalancer,
    LoadBalancingRule, NetworkInterface, NetworkSecurityGroup, Probe, PublicIpAddress,
    SecurityRule, SecurityRuleAccess, SecurityRuleDirection, SecurityRuleProtocol, Sku, Subnet,
    TransportProtocol, VirtualNetwork,
};

/// Convenient result alias that reuses the shared Stratus error type.
pub type Result<T> = stratus_core::Result<T>;
