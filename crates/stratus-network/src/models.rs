//! Network management models.
//!
//! Resources follow the management JSON layout: identity fields at the top level and
//! everything else inside a `properties` envelope. Read-only fields are optional so the
//! same structs serve as request bodies and responses.

use serde::{Deserialize, Serialize};
use stratus_core::types::{ProvisioningState, SubResource};

/// SKU of a public IP address or load balancer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sku {
    /// SKU name (`Basic`, `Standard`).
    pub name: String,
    /// SKU tier (`Regional`, `Global`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

impl Sku {
    /// The `Standard` SKU.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            name: "Standard".to_string(),
            tier: None,
        }
    }
}

/// Address prefixes of a virtual network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    /// CIDR blocks, e.g. `10.0.0.0/16`.
    #[serde(default)]
    pub address_prefixes: Vec<String>,
}

/// A virtual network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VirtualNetwork {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Network properties.
    #[serde(default)]
    pub properties: VirtualNetworkProperties,
}

/// Virtual network properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkProperties {
    /// Address space of the network.
    #[serde(default)]
    pub address_space: AddressSpace,
    /// Subnets reported by the service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subnets: Vec<Subnet>,
    /// Provisioning state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A subnet inside a virtual network.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Subnet {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Subnet properties.
    #[serde(default)]
    pub properties: SubnetProperties,
}

/// Subnet properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetProperties {
    /// CIDR block of the subnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_prefix: Option<String>,
    /// Security group attached to the subnet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_security_group: Option<SubResource>,
    /// Provisioning state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// Protocol matched by a security rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecurityRuleProtocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
    /// ICMP
    Icmp,
    /// Any protocol
    #[serde(rename = "*")]
    Any,
}

/// Whether matching traffic is allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecurityRuleAccess {
    /// Allow traffic
    Allow,
    /// Deny traffic
    Deny,
}

/// Direction of traffic a rule applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecurityRuleDirection {
    /// Incoming traffic
    Inbound,
    /// Outgoing traffic
    Outbound,
}

/// A network security group.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkSecurityGroup {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Group properties.
    #[serde(default)]
    pub properties: NetworkSecurityGroupProperties,
}

/// Network security group properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecurityGroupProperties {
    /// Rules evaluated by priority.
    #[serde(default)]
    pub security_rules: Vec<SecurityRule>,
    /// Provisioning state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A single security rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityRule {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Rule name.
    pub name: String,
    /// Rule properties.
    pub properties: SecurityRuleProperties,
}

/// Security rule properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRuleProperties {
    /// Protocol matched.
    pub protocol: SecurityRuleProtocol,
    /// Source port or range (`*` for any).
    pub source_port_range: String,
    /// Destination port or range.
    pub destination_port_range: String,
    /// Source CIDR or tag.
    pub source_address_prefix: String,
    /// Destination CIDR or tag.
    pub destination_address_prefix: String,
    /// Allow or deny.
    pub access: SecurityRuleAccess,
    /// Priority, lower wins (100-4096).
    pub priority: u16,
    /// Traffic direction.
    pub direction: SecurityRuleDirection,
}

impl SecurityRule {
    /// Inbound rule allowing TCP traffic from anywhere to `port`.
    #[must_use]
    pub fn allow_inbound_tcp(name: impl Into<String>, port: u16, priority: u16) -> Self {
        Self {
            id: None,
            name: name.into(),
            properties: SecurityRuleProperties {
                protocol: SecurityRuleProtocol::Tcp,
                source_port_range: "*".to_string(),
                destination_port_range: port.to_string(),
                source_address_prefix: "*".to_string(),
                destination_address_prefix: "*".to_string(),
                access: SecurityRuleAccess::Allow,
                priority,
                direction: SecurityRuleDirection::Inbound,
            },
        }
    }
}

/// A public IP address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublicIpAddress {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    /// Address properties.
    #[serde(default)]
    pub properties: PublicIpAddressProperties,
}

/// Public IP address properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddressProperties {
    /// `Static` or `Dynamic`.
    #[serde(
        rename = "publicIPAllocationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub public_ip_allocation_method: Option<String>,
    /// `IPv4` or `IPv6`.
    #[serde(
        rename = "publicIPAddressVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub public_ip_address_version: Option<String>,
    /// Assigned address, once allocated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Provisioning state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

impl PublicIpAddress {
    /// Assigned address, once allocated.
    #[must_use]
    pub fn ip_address(&self) -> Option<&str> {
        self.properties.ip_address.as_deref()
    }
}

/// A network interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NetworkInterface {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Interface properties.
    #[serde(default)]
    pub properties: NetworkInterfaceProperties,
}

/// Network interface properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceProperties {
    /// IP configurations; the first one is primary.
    #[serde(default)]
    pub ip_configurations: Vec<IpConfiguration>,
    /// Provisioning state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// IP configuration of a network interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IpConfiguration {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Configuration name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Configuration properties.
    #[serde(default)]
    pub properties: IpConfigurationProperties,
}

/// IP configuration properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpConfigurationProperties {
    /// Subnet the interface is placed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<SubResource>,
    /// Public IP bound to the interface.
    #[serde(
        rename = "publicIPAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub public_ip_address: Option<SubResource>,
    /// Private address, once allocated.
    #[serde(
        rename = "privateIPAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_address: Option<String>,
    /// `Static` or `Dynamic`.
    #[serde(
        rename = "privateIPAllocationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_allocation_method: Option<String>,
    /// Load balancer backend pools the interface belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancer_backend_address_pools: Vec<SubResource>,
}

/// Transport protocol of a load balancer probe or rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransportProtocol {
    /// TCP
    Tcp,
    /// UDP
    Udp,
    /// Any protocol
    All,
}

/// A load balancer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoadBalancer {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    /// Load balancer properties.
    #[serde(default)]
    pub properties: LoadBalancerProperties,
}

/// Load balancer properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerProperties {
    /// Frontend IP configurations.
    #[serde(rename = "frontendIPConfigurations", default)]
    pub frontend_ip_configurations: Vec<FrontendIpConfiguration>,
    /// Backend address pools.
    #[serde(default)]
    pub backend_address_pools: Vec<BackendAddressPool>,
    /// Health probes.
    #[serde(default)]
    pub probes: Vec<Probe>,
    /// Load balancing rules.
    #[serde(default)]
    pub load_balancing_rules: Vec<LoadBalancingRule>,
    /// Provisioning state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// Frontend IP configuration of a load balancer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FrontendIpConfiguration {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Configuration name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Configuration properties.
    #[serde(default)]
    pub properties: FrontendIpConfigurationProperties,
}

/// Frontend IP configuration properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FrontendIpConfigurationProperties {
    /// Public IP the frontend listens on.
    #[serde(
        rename = "publicIPAddress",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub public_ip_address: Option<SubResource>,
    /// `Static` or `Dynamic`.
    #[serde(
        rename = "privateIPAllocationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_ip_allocation_method: Option<String>,
}

/// Backend address pool of a load balancer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BackendAddressPool {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Pool name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pool properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BackendAddressPoolProperties>,
}

/// Backend address pool properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackendAddressPoolProperties {
    /// Interface IP configurations in the pool.
    #[serde(rename = "backendIPConfigurations", default)]
    pub backend_ip_configurations: Vec<SubResource>,
}

/// Health probe of a load balancer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Probe {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Probe name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Probe properties.
    #[serde(default)]
    pub properties: ProbeProperties,
}

/// Health probe properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProbeProperties {
    /// Probe protocol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<TransportProtocol>,
    /// Probed port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Seconds between probes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_in_seconds: Option<u32>,
    /// Failed probes before a backend is marked down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_probes: Option<u32>,
}

/// Load balancing rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoadBalancingRule {
    /// Full resource ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Rule name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Rule properties.
    #[serde(default)]
    pub properties: LoadBalancingRuleProperties,
}

/// Load balancing rule properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancingRuleProperties {
    /// Protocol balanced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<TransportProtocol>,
    /// Frontend port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_port: Option<u16>,
    /// Backend port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_port: Option<u16>,
    /// Idle timeout in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_in_minutes: Option<u32>,
    /// Direct server return.
    #[serde(
        rename = "enableFloatingIP",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_floating_ip: Option<bool>,
    /// `Default`, `SourceIP` or `SourceIPProtocol`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_distribution: Option<String>,
    /// Frontend the rule listens on.
    #[serde(
        rename = "frontendIPConfiguration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub frontend_ip_configuration: Option<SubResource>,
    /// Pool traffic is sent to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_address_pool: Option<SubResource>,
    /// Probe deciding backend health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probe: Option<SubResource>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn security_rule_wire_format() {
        let rule = SecurityRule::allow_inbound_tcp("RDP-access-rule", 3389, 110);
        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "name": "RDP-access-rule",
                "properties": {
                    "protocol": "Tcp",
                    "sourcePortRange": "*",
                    "destinationPortRange": "3389",
                    "sourceAddressPrefix": "*",
                    "destinationAddressPrefix": "*",
                    "access": "Allow",
                    "priority": 110,
                    "direction": "Inbound"
                }
            })
        );
    }

    #[test]
    fn ip_configuration_uses_ip_casing() {
        let config = IpConfiguration {
            name: Some("primary".to_string()),
            properties: IpConfigurationProperties {
                subnet: Some(SubResource::new("subnet-id")),
                public_ip_address: Some(SubResource::new("ip-id")),
                ..IpConfigurationProperties::default()
            },
            ..IpConfiguration::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["properties"]["publicIPAddress"]["id"], "ip-id");
        assert!(value["properties"]
            .get("loadBalancerBackendAddressPools")
            .is_none());
    }

    #[test]
    fn public_ip_reports_address() {
        let ip: PublicIpAddress = serde_json::from_value(json!({
            "name": "webserver0_ip",
            "sku": {"name": "Standard", "tier": "Regional"},
            "properties": {
                "publicIPAllocationMethod": "Static",
                "ipAddress": "20.87.1.2",
                "provisioningState": "Succeeded"
            }
        }))
        .unwrap();
        assert_eq!(ip.ip_address(), Some("20.87.1.2"));
        assert_eq!(ip.sku, Some(Sku { name: "Standard".into(), tier: Some("Regional".into()) }));
    }
}
