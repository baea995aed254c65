//! Asynchronous compute management client implementation.

use crate::models::{RunCommandInput, RunCommandResult, VirtualMachine};
use crate::Result;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use stratus_core::client::{
    ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder, COMPUTE_DEFAULT_TIMEOUT,
};
use stratus_core::credentials::TokenCredential;
use stratus_core::ids::{ResourceId, COMPUTE_NAMESPACE};
use stratus_core::query::QueryParams;
use stratus_core::types::{Service, COMPUTE_API_VERSION};
use url::Url;

const USER_AGENT: &str = concat!("stratus-compute/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ComputeClient`].
#[derive(Debug, Clone)]
pub struct ComputeClientBuilder {
    inner: ServiceClientBuilder,
    subscription_id: String,
}

impl ComputeClientBuilder {
    /// Create a builder for the management endpoint and subscription.
    pub fn new(base_url: impl AsRef<str>, subscription_id: impl Into<String>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            Service::Compute,
            base_url,
            Duration::from_secs(COMPUTE_DEFAULT_TIMEOUT),
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
    pub fn build(self) -> Result<ComputeClient> {
        let inner = self.inner.build()?;
        Ok(ComputeClient {
            inner,
            subscription_id: self.subscription_id,
        })
    }
}

/// Asynchronous compute management client.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    inner: ServiceClient,
    subscription_id: String,
}

impl ComputeClient {
    /// Construct a client without authentication.
    pub fn new(base_url: impl AsRef<str>, subscription_id: impl Into<String>) -> Result<Self> {
        ComputeClientBuilder::new(base_url, subscription_id)?.build()
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.inner.base_url()
    }

    /// Create or update a virtual machine.
    pub async fn create_or_update_virtual_machine(
        &self,
        group: &str,
        name: &str,
        machine: &VirtualMachine,
    ) -> Result<VirtualMachine> {
        let id = ResourceId::virtual_machine(&self.subscription_id, group, name);
        self.inner
            .send_json(Method::PUT, &id.path(), Some(machine), &Self::params())
            .await
    }

    /// Fetch a virtual machine.
    pub async fn get_virtual_machine(&self, group: &str, name: &str) -> Result<VirtualMachine> {
        let id = ResourceId::virtual_machine(&self.subscription_id, group, name);
        self.inner.get_json(&id.path(), &Self::params()).await
    }

    /// List every virtual machine in a resource group.
    pub async fn list_virtual_machines(&self, group: &str) -> Result<Vec<VirtualMachine>> {
        let path = format!(
            "subscriptions/{}/resourceGroups/{group}/providers/{COMPUTE_NAMESPACE}/virtualMachines",
            self.subscription_id
        );
        self.inner.list_all(&path, &Self::params()).await
    }

    /// Run a script inside a virtual machine.
    ///
    /// The service usually accepts the command asynchronously with an empty body, in which
    /// case `None` is returned.
    pub async fn run_command(
        &self,
        group: &str,
        name: &str,
        input: &RunCommandInput,
    ) -> Result<Option<RunCommandResult>> {
        let id = ResourceId::virtual_machine(&self.subscription_id, group, name);
        let path = format!("{}/runCommand", id.path());
        self.inner
            .send_json(Method::POST, &path, Some(input), &Self::params())
            .await
    }

    fn params() -> Vec<(&'static str, String)> {
        QueryParams::api_version(COMPUTE_API_VERSION).into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HardwareProfile, VirtualMachineProperties};
    use serde_json::json;
    use stratus_core::Error;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PREFIX: &str = "/subscriptions/sub-1/resourceGroups/shop/providers/Microsoft.Compute";

    fn client(server: &MockServer) -> ComputeClient {
        ComputeClientBuilder::new(server.uri(), "sub-1")
            .unwrap()
            .with_retry_policy(RetryPolicy::no_retry())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn create_virtual_machine() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(format!("{PREFIX}/virtualMachines/webserver0").as_str()))
            .and(query_param("api-version", COMPUTE_API_VERSION))
            .and(body_json(json!({
                "location": "southafricanorth",
                "properties": {"hardwareProfile": {"vmSize": "Standard_B1s"}}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "name": "webserver0",
                "properties": {"vmId": "abc", "provisioningState": "Creating"}
            })))
            .mount(&server)
            .await;

        let machine = VirtualMachine {
            location: Some("southafricanorth".into()),
            properties: VirtualMachineProperties {
                hardware_profile: Some(HardwareProfile {
                    vm_size: "Standard_B1s".into(),
                }),
                ..VirtualMachineProperties::default()
            },
            ..VirtualMachine::default()
        };
        let created = client(&server)
            .create_or_update_virtual_machine("shop", "webserver0", &machine)
            .await
            .unwrap();
        assert_eq!(created.properties.vm_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn run_command_accepted_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                format!("{PREFIX}/virtualMachines/webserver0/runCommand").as_str(),
            ))
            .and(body_json(json!({
                "commandId": "RunPowerShellScript",
                "script": ["Install-WindowsFeature -name Web-Server"]
            })))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let input = RunCommandInput::powershell(["Install-WindowsFeature -name Web-Server"]);
        let result = client(&server)
            .run_command("shop", "webserver0", &input)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn run_command_with_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                format!("{PREFIX}/virtualMachines/webserver0/runCommand").as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"code": "ComponentStatus/StdOut/succeeded", "message": "ok"}]
            })))
            .mount(&server)
            .await;

        let result = client(&server)
            .run_command("shop", "webserver0", &RunCommandInput::powershell(["hostname"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result.value[0].message.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn list_virtual_machines_in_group() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{PREFIX}/virtualMachines").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"name": "webserver0"}, {"name": "dbserver"}]
            })))
            .mount(&server)
            .await;

        let machines = client(&server).list_virtual_machines("shop").await.unwrap();
        let names: Vec<_> = machines.iter().filter_map(|m| m.name.as_deref()).collect();
        assert_eq!(names, vec!["webserver0", "dbserver"]);
    }

    #[tokio::test]
    async fn get_missing_virtual_machine() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{PREFIX}/virtualMachines/ghost").as_str()))
            .respond_with(ResponseTemplate::new(404).set_body_string("ResourceNotFound"))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_virtual_machine("shop", "ghost")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
