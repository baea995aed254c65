//! Asynchronous resource group client implementation.

use crate::models::ResourceGroup;
use crate::Result;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use stratus_core::client::{
    ClientConfig, RetryPolicy, ServiceClient, ServiceClientBuilder, RESOURCES_DEFAULT_TIMEOUT,
};
use stratus_core::credentials::TokenCredential;
use stratus_core::query::QueryParams;
use stratus_core::types::{Service, RESOURCES_API_VERSION};
use stratus_core::Error;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("stratus-resources/", env!("CARGO_PKG_VERSION"));

/// Builder for [`ResourcesClient`].
#[derive(Debug, Clone)]
pub struct ResourcesClientBuilder {
    inner: ServiceClientBuilder,
    subscription_id: String,
}

impl ResourcesClientBuilder {
    /// Create a builder for the management endpoint and subscription.
    pub fn new(base_url: impl AsRef<str>, subscription_id: impl Into<String>) -> Result<Self> {
        let builder = ServiceClientBuilder::new(
            Service::Resources,
            base_url,
            Duration::from_secs(RESOURCES_DEFAULT_TIMEOUT),
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
    pub fn build(self) -> Result<ResourcesClient> {
        let inner = self.inner.build()?;
        Ok(ResourcesClient {
            inner,
            subscription_id: self.subscription_id,
        })
    }
}

/// Asynchronous resource group client.
#[derive(Debug, Clone)]
pub struct ResourcesClient {
    inner: ServiceClient,
    subscription_id: String,
}

impl ResourcesClient {
    /// Construct a client without authentication.
    pub fn new(base_url: impl AsRef<str>, subscription_id: impl Into<String>) -> Result<Self> {
        ResourcesClientBuilder::new(base_url, subscription_id)?.build()
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

    /// Check whether a resource group exists.
    pub async fn check_existence(&self, group: &str) -> Result<bool> {
        match self
            .inner
            .send_empty(Method::HEAD, &self.group_path(group), &Self::params())
            .await
        {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => {
                debug!(group, "resource group does not exist");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Create or update a resource group in `location`.
    pub async fn create_or_update(&self, group: &str, location: &str) -> Result<ResourceGroup> {
        let body = ResourceGroup::new(location);
        self.inner
            .send_json(
                Method::PUT,
                &self.group_path(group),
                Some(&body),
                &Self::params(),
            )
            .await
    }

    /// Fetch a resource group.
    pub async fn get(&self, group: &str) -> Result<ResourceGroup> {
        self.inner
            .get_json(&self.group_path(group), &Self::params())
            .await
    }

    /// Start deleting a resource group and everything in it.
    pub async fn delete(&self, group: &str) -> Result<()> {
        self.inner
            .send_empty(Method::DELETE, &self.group_path(group), &Self::params())
            .await?;
        Ok(())
    }

    fn group_path(&self, group: &str) -> String {
        format!(
            "subscriptions/{}/resourcegroups/{group}",
            self.subscription_id
        )
    }

    fn params() -> Vec<(&'static str, String)> {
        QueryParams::api_version(RESOURCES_API_VERSION).into_pairs()
    }
}
