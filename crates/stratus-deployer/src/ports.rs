//! Management operations the provisioner depends on.
//!
//! The provisioner talks to these traits instead of the concrete clients so the order of
//! calls can be checked without a live subscription.

use async_trait::async_trait;
use stratus_compute::models::{RunCommandInput, RunCommandResult, VirtualMachine};
use stratus_compute::ComputeClient;
use stratus_network::models::{
    BackendAddressPool, LoadBalancer, NetworkInterface, NetworkSecurityGroup, PublicIpAddress,
    Subnet, VirtualNetwork,
};
use stratus_network::NetworkClient;
use stratus_resources::{ResourceGroup, ResourcesClient};

use crate::Result;

/// Resource group operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceGroupApi: Send + Sync {
    /// Whether the group exists.
    async fn exists(&self, group: &str) -> Result<bool>;
    /// Create the group in `location`.
    async fn create(&self, group: &str, location: &str) -> Result<ResourceGroup>;
    /// Delete the group and everything in it.
    async fn delete(&self, group: &str) -> Result<()>;
}

/// Network operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// Create a virtual network.
    async fn create_virtual_network(
        &self,
        group: &str,
        name: &str,
        network: &VirtualNetwork,
    ) -> Result<VirtualNetwork>;
    /// Create a network security group.
    async fn create_security_group(
        &self,
        group: &str,
        name: &str,
        nsg: &NetworkSecurityGroup,
    ) -> Result<NetworkSecurityGroup>;
    /// Create a subnet.
    async fn create_subnet(
        &self,
        group: &str,
        vnet: &str,
        name: &str,
        subnet: &Subnet,
    ) -> Result<Subnet>;
    /// Create a public IP address.
    async fn create_public_ip(
        &self,
        group: &str,
        name: &str,
        address: &PublicIpAddress,
    ) -> Result<PublicIpAddress>;
    /// Fetch a public IP address.
    async fn get_public_ip(&self, group: &str, name: &str) -> Result<PublicIpAddress>;
    /// List the public IP addresses of a group.
    async fn list_public_ips(&self, group: &str) -> Result<Vec<PublicIpAddress>>;
    /// Create or replace a network interface.
    async fn create_network_interface(
        &self,
        group: &str,
        name: &str,
        interface: &NetworkInterface,
    ) -> Result<NetworkInterface>;
    /// Create a load balancer.
    async fn create_load_balancer(
        &self,
        group: &str,
        name: &str,
        balancer: &LoadBalancer,
    ) -> Result<LoadBalancer>;
    /// List the load balancers of a group.
    async fn list_load_balancers(&self, group: &str) -> Result<Vec<LoadBalancer>>;
    /// Fetch a load balancer backend pool.
    async fn get_backend_pool(
        &self,
        group: &str,
        load_balancer: &str,
        pool: &str,
    ) -> Result<BackendAddressPool>;
}

/// Compute operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Create a virtual machine.
    async fn create_virtual_machine(
        &self,
        group: &str,
        name: &str,
        machine: &VirtualMachine,
    ) -> Result<VirtualMachine>;
    /// List the virtual machines of a group.
    async fn list_virtual_machines(&self, group: &str) -> Result<Vec<VirtualMachine>>;
    /// Run a script inside a virtual machine.
    async fn run_command(
        &self,
        group: &str,
        name: &str,
        input: &RunCommandInput,
    ) -> Result<Option<RunCommandResult>>;
}

#[async_trait]
impl ResourceGroupApi for ResourcesClient {
    async fn exists(&self, group: &str) -> Result<bool> {
        self.check_existence(group).await
    }

    async fn create(&self, group: &str, location: &str) -> Result<ResourceGroup> {
        self.create_or_update(group, location).await
    }

    async fn delete(&self, group: &str) -> Result<()> {
        ResourcesClient::delete(self, group).await
    }
}

#[async_trait]
impl NetworkApi for NetworkClient {
    async fn create_virtual_network(
        &self,
        group: &str,
        name: &str,
        network: &VirtualNetwork,
    ) -> Result<VirtualNetwork> {
        self.create_or_update_virtual_network(group, name, network)
            .await
    }

    async fn create_security_group(
        &self,
        group: &str,
        name: &str,
        nsg: &NetworkSecurityGroup,
    ) -> Result<NetworkSecurityGroup> {
        self.create_or_update_network_security_group(group, name, nsg)
            .await
    }

    async fn create_subnet(
        &self,
        group: &str,
        vnet: &str,
        name: &str,
        subnet: &Subnet,
    ) -> Result<Subnet> {
        self.create_or_update_subnet(group, vnet, name, subnet).await
    }

    async fn create_public_ip(
        &self,
        group: &str,
        name: &str,
        address: &PublicIpAddress,
    ) -> Result<PublicIpAddress> {
        self.create_or_update_public_ip_address(group, name, address)
            .await
    }

    async fn get_public_ip(&self, group: &str, name: &str) -> Result<PublicIpAddress> {
        self.get_public_ip_address(group, name).await
    }

    async fn list_public_ips(&self, group: &str) -> Result<Vec<PublicIpAddress>> {
        self.list_public_ip_addresses(group).await
    }

    async fn create_network_interface(
        &self,
        group: &str,
        name: &str,
        interface: &NetworkInterface,
    ) -> Result<NetworkInterface> {
        self.create_or_update_network_interface(group, name, interface)
            .await
    }

    async fn create_load_balancer(
        &self,
        group: &str,
        name: &str,
        balancer: &LoadBalancer,
    ) -> Result<LoadBalancer> {
        self.create_or_update_load_balancer(group, name, balancer)
            .await
    }

    async fn list_load_balancers(&self, group: &str) -> Result<Vec<LoadBalancer>> {
        NetworkClient::list_load_balancers(self, group).await
    }

    async fn get_backend_pool(
        &self,
        group: &str,
        load_balancer: &str,
        pool: &str,
    ) -> Result<BackendAddressPool> {
        self.get_backend_address_pool(group, load_balancer, pool)
            .await
    }
}

#[async_trait]
impl ComputeApi for ComputeClient {
    async fn create_virtual_machine(
        &self,
        group: &str,
        name: &str,
        machine: &VirtualMachine,
    ) -> Result<VirtualMachine> {
        self.create_or_update_virtual_machine(group, name, machine)
            .await
    }

    async fn list_virtual_machines(&self, group: &str) -> Result<Vec<VirtualMachine>> {
        ComputeClient::list_virtual_machines(self, group).await
    }

    async fn run_command(
        &self,
        group: &str,
        name: &str,
        input: &RunCommandInput,
    ) -> Result<Option<RunCommandResult>> {
        ComputeClient::run_command(self, group, name, input).await
    }
}
