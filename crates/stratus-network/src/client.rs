//! Asynchronous network management client implementation.

use crate::models::{
    BackendAddressPool, LoadBalancer, NetworkInterface, NetworkSecurityGroup, PublicIpAddress,
    Subnet, VirtualNetwork,
};
use crate::Result;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use stratus_core::client::{
    ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder, NETWORK_DEFAULT_TIMEOUT,
};
use stratus_core::credentials::TokenCredential;
use stratus_core::ids::{ResourceId, NETWORK_NAMESPACE};
use stratus_core::query::QueryParams;
use stratus_core::types::{Service, NETWORK_API_VERSION};
use url::Url;

const USER_AGENT: &str = concat!("stratus-network/", env!("CARGO_PKG_VERSION"));

/// Builder for [`NetworkClient`].
#[derive(Debug, Clone)]
pub struct NetworkClientBuilder {
    inner: ServiceClientBuilder,
    subscription_id: String,
}

impl NetworkClientBuilder {
    /// Create a builder for the management endpoint and subscription.
    pub fn new(base_url: impl AsRef<str>, subscription_id: impl Into<String>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            Service::Network,
            base_url,
            Duration::from_secs(NETWORK_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT);

        Ok(Self {
            inner: builder,
            subscription_id: subscription_id.into(),
        })
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.inner = self.inner.with_http_config(config);
        self
    }

    /// Authenticate with bearer tokens from `credential`.
    #[must_use]
    pub fn with_credential(mut self, credential: Arc<dyn TokenCredential>) -> Self {
        self.inner = self.inner.with_credential(credential);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NetworkClient> {
        let inner = self.inner.build()?;
        Ok(NetworkClient {
            inner,
            subscription_id: self.subscription_id,
        })
    }
}

/// Asynchronous network management client.
#[derive(Debug, Clone)]
pub struct NetworkClient {
    inner: ServiceClient,
    subscription_id: String,
}

impl NetworkClient {
    /// Construct a client without authentication.
    pub fn new(base_url: impl AsRef<str>, subscription_id: impl Into<String>) -> Result<Self> {
        NetworkClientBuilder::new(base_url, subscription_id)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Return the subscription this client manages.
    #[must_use]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Create or update a virtual network.
    pub async fn create_or_update_virtual_network(
        &self,
        group: &str,
        name: &str,
        network: &VirtualNetwork,
    ) -> Result<VirtualNetwork> {
        let id = ResourceId::virtual_network(&self.subscription_id, group, name);
        self.put(&id, network).await
    }

    /// Create or update a network security group.
    pub async fn create_or_update_network_security_group(
        &self,
        group: &str,
        name: &str,
        nsg: &NetworkSecurityGroup,
    ) -> Result<NetworkSecurityGroup> {
        let id = ResourceId::network_security_group(&self.subscription_id, group, name);
        self.put(&id, nsg).await
    }

    /// Create or update a subnet inside `vnet`.
    pub async fn create_or_update_subnet(
        &self,
        group: &str,
        vnet: &str,
        name: &str,
        subnet: &Subnet,
    ) -> Result<Subnet> {
        let id = ResourceId::subnet(&self.subscription_id, group, vnet, name);
        self.put(&id, subnet).await
    }

    /// Create or update a public IP address.
    pub async fn create_or_update_public_ip_address(
        &self,
        group: &str,
        name: &str,
        address: &PublicIpAddress,
    ) -> Result<PublicIpAddress> {
        let id = ResourceId::public_ip_address(&self.subscription_id, group, name);
        self.put(&id, address).await
    }

    /// Fetch a public IP address.
    pub async fn get_public_ip_address(&self, group: &str, name: &str) -> Result<PublicIpAddress> {
        let id = ResourceId::public_ip_address(&self.subscription_id, group, name);
        self.get(&id).await
    }

    /// List every public IP address in a resource group.
    pub async fn list_public_ip_addresses(&self, group: &str) -> Result<Vec<PublicIpAddress>> {
        self.list(group, "publicIPAddresses").await
    }

    /// Create or update a network interface.
    pub async fn create_or_update_network_interface(
        &self,
        group: &str,
        name: &str,
        interface: &NetworkInterface,
    ) -> Result<NetworkInterface> {
        let id = ResourceId::network_interface(&self.subscription_id, group, name);
        self.put(&id, interface).await
    }

    /// Create or update a load balancer.
    pub async fn create_or_update_load_balancer(
        &self,
        group: &str,
        name: &str,
        balancer: &LoadBalancer,
    ) -> Result<LoadBalancer> {
        let id = ResourceId::load_balancer(&self.subscription_id, group, name);
        self.put(&id, balancer).await
    }

    /// List every load balancer in a resource group.
    pub async fn list_load_balancers(&self, group: &str) -> Result<Vec<LoadBalancer>> {
        self.list(group, "loadBalancers").await
    }

    /// Fetch a backend address pool of a load balancer.
    pub async fn get_backend_address_pool(
        &self,
        group: &str,
        load_balancer: &str,
        pool: &str,
    ) -> Result<BackendAddressPool> {
        let id =
            ResourceId::backend_address_pool(&self.subscription_id, group, load_balancer, pool);
        self.get(&id).await
    }

    async fn put<T>(&self, id: &ResourceId, body: &T) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        self.inner
            .send_json(Method::PUT, &id.path(), Some(body), &Self::params())
            .await
    }

    async fn get<T>(&self, id: &ResourceId) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.inner.get_json(&id.path(), &Self::params()).await
    }

    async fn list<T>(&self, group: &str, resource_type: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let path = format!(
            "subscriptions/{}/resourceGroups/{group}/providers/{NETWORK_NAMESPACE}/{resource_type}",
            self.subscription_id
        );
        self.inner.list_all(&path, &Self::params()).await
    }

    fn params() -> Vec<(&'static str, String)> {
        QueryParams::api_version(NETWORK_API_VERSION).into_pairs()
    }
}
