//! Request payloads for every resource a deployment creates.

use stratus_compute::models::{
    HardwareProfile, ImageReference, ManagedDisk, NetworkInterfaceReference, NetworkProfile,
    OsDisk, OsProfile, RunCommandInput, StorageProfile, VirtualMachine, VirtualMachineProperties,
    WindowsConfiguration,
};
use stratus_core::ids::ResourceId;
use stratus_core::types::SubResource;
use stratus_network::models::{
    AddressSpace, BackendAddressPool, FrontendIpConfiguration, FrontendIpConfigurationProperties,
    IpConfiguration, IpConfigurationProperties, LoadBalancer, LoadBalancerProperties,
    LoadBalancingRule, LoadBalancingRuleProperties, NetworkInterface, NetworkInterfaceProperties,
    NetworkSecurityGroup, NetworkSecurityGroupProperties, Probe, ProbeProperties, PublicIpAddress,
    PublicIpAddressProperties, SecurityRule, Sku, Subnet, SubnetProperties, TransportProtocol,
    VirtualNetwork, VirtualNetworkProperties,
};

use crate::deployment::{AdminCredentials, Tier};
use crate::naming::{DeploymentNames, PROBE_NAME};

/// Address space of the deployment network.
pub const VNET_ADDRESS_PREFIX: &str = "10.0.0.0/16";
/// Address range of the deployment subnet.
pub const SUBNET_ADDRESS_PREFIX: &str = "10.0.0.0/24";
/// Size of every VM.
pub const VM_SIZE: &str = "Standard_B1s";
/// Port opened for remote desktop.
pub const RDP_PORT: u16 = 3389;
/// Port served by the webservers.
pub const HTTP_PORT: u16 = 80;

/// Script installing IIS and replacing the default page with a greeting.
pub const IIS_SETUP_SCRIPT: [&str; 3] = [
    "Install-WindowsFeature -name Web-Server -IncludeManagementTools",
    r"Remove-item 'C:\inetpub\wwwroot\iisstart.htm'",
    r"Add-Content -Path 'C:\inetpub\wwwroot\iisstart.htm' -Value $('Hello World from ' + $env:computername)",
];

/// Virtual network covering [`VNET_ADDRESS_PREFIX`].
#[must_use]
pub fn virtual_network(location: &str) -> VirtualNetwork {
    VirtualNetwork {
        location: Some(location.to_string()),
        properties: VirtualNetworkProperties {
            address_space: AddressSpace {
                address_prefixes: vec![VNET_ADDRESS_PREFIX.to_string()],
            },
            ..VirtualNetworkProperties::default()
        },
        ..VirtualNetwork::default()
    }
}

/// Inbound rules for `tier`: RDP always, HTTP only behind a load balancer.
#[must_use]
pub fn security_rules(tier: Tier) -> Vec<SecurityRule> {
    let mut rules = vec![SecurityRule::allow_inbound_tcp(
        "RDP-access-rule",
        RDP_PORT,
        110,
    )];
    if tier.has_load_balancer() {
        rules.push(SecurityRule::allow_inbound_tcp("lb-HTTP-rule", HTTP_PORT, 100));
    }
    rules
}

/// Network security group with the rules for `tier`.
#[must_use]
pub fn network_security_group(location: &str, tier: Tier) -> NetworkSecurityGroup {
    NetworkSecurityGroup {
        location: Some(location.to_string()),
        properties: NetworkSecurityGroupProperties {
            security_rules: security_rules(tier),
            provisioning_state: None,
        },
        ..NetworkSecurityGroup::default()
    }
}

/// Subnet covering [`SUBNET_ADDRESS_PREFIX`] guarded by the given security group.
#[must_use]
pub fn subnet(nsg_id: &str) -> Subnet {
    Subnet {
        properties: SubnetProperties {
            address_prefix: Some(SUBNET_ADDRESS_PREFIX.to_string()),
            network_security_group: Some(SubResource::new(nsg_id)),
            provisioning_state: None,
        },
        ..Subnet::default()
    }
}

/// Static public IP with the Standard SKU.
#[must_use]
pub fn public_ip(location: &str) -> PublicIpAddress {
    PublicIpAddress {
        location: Some(location.to_string()),
        sku: Some(Sku::standard()),
        properties: PublicIpAddressProperties {
            public_ip_allocation_method: Some("Static".to_string()),
            ..PublicIpAddressProperties::default()
        },
        ..PublicIpAddress::default()
    }
}

/// NIC for `server` in `subnet_id`, optionally exposed through a public IP and placed in
/// a load balancer backend pool.
#[must_use]
pub fn network_interface(
    location: &str,
    server: &str,
    subnet_id: &str,
    public_ip_id: Option<&str>,
    backend_pool_id: Option<&str>,
) -> NetworkInterface {
    NetworkInterface {
        location: Some(location.to_string()),
        properties: NetworkInterfaceProperties {
            ip_configurations: vec![IpConfiguration {
                name: Some(DeploymentNames::ip_configuration(server)),
                properties: IpConfigurationProperties {
                    subnet: Some(SubResource::new(subnet_id)),
                    public_ip_address: public_ip_id.map(SubResource::new),
                    load_balancer_backend_address_pools: backend_pool_id
                        .map(SubResource::new)
                        .into_iter()
                        .collect(),
                    ..IpConfigurationProperties::default()
                },
                ..IpConfiguration::default()
            }],
            provisioning_state: None,
        },
        ..NetworkInterface::default()
    }
}

/// Windows Server 2019 Datacenter webserver.
#[must_use]
pub fn webserver_vm(
    location: &str,
    name: &str,
    nic_id: &str,
    admin: &AdminCredentials,
) -> VirtualMachine {
    server_vm(
        location,
        name,
        nic_id,
        admin,
        ImageReference::latest("MicrosoftWindowsServer", "WindowsServer", "2019-Datacenter"),
    )
}

/// SQL Server 2019 developer edition on Windows Server 2019.
#[must_use]
pub fn dbserver_vm(
    location: &str,
    name: &str,
    nic_id: &str,
    admin: &AdminCredentials,
) -> VirtualMachine {
    server_vm(
        location,
        name,
        nic_id,
        admin,
        ImageReference::latest("MicrosoftSQLServer", "sql2019-ws2019", "sqldev-gen2"),
    )
}

fn server_vm(
    location: &str,
    name: &str,
    nic_id: &str,
    admin: &AdminCredentials,
    image: ImageReference,
) -> VirtualMachine {
    VirtualMachine {
        location: Some(location.to_string()),
        properties: VirtualMachineProperties {
            hardware_profile: Some(HardwareProfile {
                vm_size: VM_SIZE.to_string(),
            }),
            storage_profile: Some(StorageProfile {
                image_reference: Some(image),
                os_disk: Some(OsDisk {
                    caching: Some("ReadWrite".to_string()),
                    managed_disk: Some(ManagedDisk {
                        storage_account_type: "Standard_LRS".to_string(),
                    }),
                    create_option: "FromImage".to_string(),
                }),
            }),
            os_profile: Some(OsProfile {
                computer_name: name.to_string(),
                admin_username: admin.username().to_string(),
                admin_password: Some(admin.password().to_string()),
                windows_configuration: Some(WindowsConfiguration {
                    enable_automatic_updates: true,
                }),
            }),
            network_profile: Some(NetworkProfile {
                network_interfaces: vec![NetworkInterfaceReference {
                    id: nic_id.to_string(),
                }],
            }),
            ..VirtualMachineProperties::default()
        },
        ..VirtualMachine::default()
    }
}

/// Run command installing IIS.
#[must_use]
pub fn iis_setup_command() -> RunCommandInput {
    RunCommandInput::powershell(IIS_SETUP_SCRIPT)
}

/// Standard load balancer forwarding TCP/80 to the backend pool.
#[must_use]
pub fn load_balancer(
    location: &str,
    subscription: &str,
    names: &DeploymentNames,
    public_ip_id: &str,
) -> LoadBalancer {
    let group = names.group();
    let lb_name = names.load_balancer();
    let frontend_id =
        ResourceId::frontend_ip_configuration(subscription, group, &lb_name, &names.frontend());
    let pool_id =
        ResourceId::backend_address_pool(subscription, group, &lb_name, &names.backend_pool());
    let probe_id = ResourceId::probe(subscription, group, &lb_name, PROBE_NAME);

    LoadBalancer {
        location: Some(location.to_string()),
        sku: Some(Sku::standard()),
        properties: LoadBalancerProperties {
            frontend_ip_configurations: vec![FrontendIpConfiguration {
                name: Some(names.frontend()),
                properties: FrontendIpConfigurationProperties {
                    public_ip_address: Some(SubResource::new(public_ip_id)),
                    private_ip_allocation_method: Some("Dynamic".to_string()),
                },
                ..FrontendIpConfiguration::default()
            }],
            backend_address_pools: vec![BackendAddressPool {
                name: Some(names.backend_pool()),
                ..BackendAddressPool::default()
            }],
            probes: vec![Probe {
                name: Some(PROBE_NAME.to_string()),
                properties: ProbeProperties {
                    protocol: Some(TransportProtocol::Tcp),
                    port: Some(HTTP_PORT),
                    interval_in_seconds: Some(5),
                    number_of_probes: Some(2),
                },
                ..Probe::default()
            }],
            load_balancing_rules: vec![LoadBalancingRule {
                name: Some(names.rule()),
                properties: LoadBalancingRuleProperties {
                    protocol: Some(TransportProtocol::Tcp),
                    frontend_port: Some(HTTP_PORT),
                    backend_port: Some(HTTP_PORT),
                    idle_timeout_in_minutes: Some(4),
                    enable_floating_ip: Some(false),
                    load_distribution: Some("Default".to_string()),
                    frontend_ip_configuration: Some(SubResource::new(frontend_id.to_string())),
                    backend_address_pool: Some(SubResource::new(pool_id.to_string())),
                    probe: Some(SubResource::new(probe_id.to_string())),
                },
                ..LoadBalancingRule::default()
            }],
            provisioning_state: None,
        },
        ..LoadBalancer::default()
    }
}
