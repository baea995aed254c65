//! The HTTP client every Stratus service client is built on.
//!
//! [`ServiceClient`] owns the connection pool, the bearer credential and the retry
//! loop; the per-service clients only add paths, API versions and payload types.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, info};
use url::Url;

use crate::credentials::TokenCredential;
use crate::error::{Error, Result};
use crate::types::{ListResponse, Service};

/// Resource group calls, in seconds
pub const RESOURCES_DEFAULT_TIMEOUT: u64 = 30;
/// Network calls, in seconds
pub const NETWORK_DEFAULT_TIMEOUT: u64 = 60;
/// Compute calls, in seconds
pub const COMPUTE_DEFAULT_TIMEOUT: u64 = 60;
/// Document database queries, in seconds
pub const DOCUMENT_DB_DEFAULT_TIMEOUT: u64 = 20;
/// Language model generation, in seconds
pub const LANGUAGE_MODEL_DEFAULT_TIMEOUT: u64 = 60;
/// Weather lookups, in seconds
pub const WEATHER_DEFAULT_TIMEOUT: u64 = 8;

/// Seconds an idle pooled connection is kept
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;
/// Idle pooled connections kept per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts after the first one
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Delay before the first retry, in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
/// Upper bound of any retry delay, in milliseconds
pub const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 5000;

/// How often and how patiently a transient failure is retried.
///
/// The delay before retry `n` is `initial_delay * backoff_multiplier^(n-1)`, capped at
/// `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Cap on every delay
    pub max_delay: Duration,
    /// Growth factor between consecutive delays
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Three retries starting at 500 ms, doubling up to 5 s.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            backoff_multiplier: 2,
        }
    }

    /// A single attempt.
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1,
        }
    }

    /// Replace the retry count.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Replace the first delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Replace the delay cap.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Replace the growth factor.
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: u32) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Delay before retry number `attempt`; zero for the first attempt.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match attempt.checked_sub(1) {
            None => Duration::ZERO,
            Some(exponent) => self
                .initial_delay
                .saturating_mul(self.backoff_multiplier.saturating_pow(exponent))
                .min(self.max_delay),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport settings of a [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Retry behaviour
    pub retry_policy: RetryPolicy,
    /// How long idle pooled connections live
    pub pool_idle_timeout: Duration,
    /// Idle pooled connections per host
    pub pool_max_idle_per_host: usize,
    /// Accept gzip responses
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Defaults: 30 s timeout, [`RetryPolicy::new`], pooled connections, gzip on.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_policy: RetryPolicy::new(),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Replace the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Replace the idle connection lifetime.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Replace the idle connection count per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Turn gzip responses on or off.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Clone)]
pub struct ServiceClientBuilder {
    service: Service,
    base_url: Url,
    http_config: ClientConfig,
    user_agent: String,
    credential: Option<Arc<dyn TokenCredential>>,
    headers: Vec<(String, String)>,
}

impl fmt::Debug for ServiceClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClientBuilder")
            .field("service", &self.service)
            .field("base_url", &self.base_url.as_str())
            .field("http_config", &self.http_config)
            .field("user_agent", &self.user_agent)
            .field("credential", &self.credential.is_some())
            .finish_non_exhaustive()
    }
}

impl ServiceClientBuilder {
    /// Create a builder for `service` rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the base URL cannot be parsed.
    pub fn new(service: Service, base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid {service} base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;

        Ok(Self {
            service,
            base_url: url,
            http_config: ClientConfig::new().with_timeout(timeout),
            user_agent: concat!("stratus-core/", env!("CARGO_PKG_VERSION")).to_string(),
            credential: None,
            headers: Vec::new(),
        })
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.http_config.retry_policy = retry;
        self
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Authenticate every request with a bearer token from `credential`.
    #[must_use]
    pub fn with_credential(mut self, credential: Arc<dyn TokenCredential>) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Send a static header with every request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<ServiceClient> {
        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .user_agent(self.user_agent)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(CONNECT_TIMEOUT);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!(
                "Failed to build {} HTTP client: {err}",
                self.service
            ))
        })?;

        Ok(ServiceClient {
            http,
            service: self.service,
            base_url: self.base_url,
            retry_policy: self.http_config.retry_policy,
            credential: self.credential,
            headers: self.headers,
        })
    }
}

/// Shared HTTP client for one remote service.
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    service: Service,
    base_url: Url,
    retry_policy: RetryPolicy,
    credential: Option<Arc<dyn TokenCredential>>,
    headers: Vec<(String, String)>,
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url.as_str())
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// The service this client talks to.
    #[must_use]
    pub const fn service(&self) -> Service {
        self.service
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Access the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        self.retry_policy
    }

    /// Resolve `path` against the base URL. Absolute URLs (paging links) are used as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the resulting URL is invalid.
    pub fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("https://") || path.starts_with("http://") {
            return Url::parse(path).map_err(|err| {
                Error::InvalidEndpoint(format!("Invalid {} link `{path}`: {err}", self.service))
            });
        }

        let normalized = path.strip_prefix('/').unwrap_or(path);
        self.base_url.join(normalized).map_err(|err| {
            Error::InvalidEndpoint(format!("Invalid {} path `{path}`: {err}", self.service))
        })
    }

    /// Send a request, retrying transient failures according to the retry policy.
    ///
    /// `customize` is applied to every attempt (headers, body); `map_status` converts a
    /// non-success status and body into an error. Non-retryable errors are returned at once.
    ///
    /// # Errors
    ///
    /// Returns the mapped error of the last attempt.
    pub async fn execute_with_retry<F, M>(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
        customize: F,
        map_status: M,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
        M: Fn(StatusCode, String) -> Error,
    {
        let token = match &self.credential {
            Some(credential) => Some(credential.token().await?),
            None => None,
        };

        let mut attempt = 0;

        loop {
            let url = self.build_url(path)?;
            let mut request = self.http.request(method.clone(), url).query(params);

            if let Some(token) = &token {
                request = request.bearer_auth(token.expose_secret());
            }
            for (name, value) in &self.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            request = customize(request);

            info!(service = %self.service, %method, path, attempt, "request");

            let error = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    let text = response.text().await.unwrap_or_default();
                    map_status(status, text)
                }
                Err(err) => Error::from(err),
            };

            attempt += 1;
            if !error.is_retryable() || attempt > self.retry_policy.max_retries {
                return Err(error);
            }
            let delay = self.retry_policy.delay_for_attempt(attempt);
            if delay > Duration::from_millis(0) {
                debug!("Retrying {} request after {:?}", self.service, delay);
                sleep(delay).await;
            }
        }
    }

    /// Send a JSON request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error or [`Error::ParseError`] if the body cannot be decoded.
    pub async fn send_json<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &[(&'static str, String)],
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let service = self.service;
        let response = self
            .execute_with_retry(
                method,
                path,
                params,
                |mut request| {
                    request = request.header("Accept", "application/json");
                    if let Some(payload) = body {
                        request = request.json(payload);
                    }
                    request
                },
                |status, text| map_status_to_error(service, status, text),
            )
            .await?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            Error::HttpError(format!("Failed to read {service} response body: {err}"))
        })?;
        deserialize_body(service, path, status, &bytes)
    }

    /// Send a GET request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ServiceClient::send_json`].
    pub async fn get_json<R>(&self, path: &str, params: &[(&'static str, String)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.send_json::<(), R>(Method::GET, path, None, params)
            .await
    }

    /// Collect every item of a paged list, following `nextLink` until it is absent.
    ///
    /// # Errors
    ///
    /// See [`ServiceClient::send_json`].
    pub async fn list_all<T>(&self, path: &str, params: &[(&'static str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page: ListResponse<T> = self.get_json(path, params).await?;

        loop {
            items.append(&mut page.value);
            match page.next_link.take() {
                Some(link) if !link.is_empty() => {
                    debug!(service = %self.service, "following next page link");
                    // The link already carries every query parameter.
                    page = self.get_json(&link, &[]).await?;
                }
                _ => break,
            }
        }

        Ok(items)
    }

    /// Send a request whose response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns the mapped HTTP error.
    pub async fn send_empty(
        &self,
        method: Method,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<StatusCode> {
        let service = self.service;
        let response = self
            .execute_with_retry(
                method,
                path,
                params,
                |request| request,
                |status, text| map_status_to_error(service, status, text),
            )
            .await?;
        Ok(response.status())
    }
}

/// Map a non-success status into the shared error type.
#[must_use]
pub fn map_status_to_error(service: Service, status: StatusCode, text: String) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::InvalidRequest(format!("{service} authentication failed: {text}"))
        }
        StatusCode::CONFLICT => Error::Conflict(text),
        StatusCode::BAD_REQUEST => Error::BadRequest(format!("{service}: {text}")),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            Error::ServiceUnavailable(format!("{service} temporarily unavailable: {text}"))
        }
        status if status.is_server_error() => {
            Error::ServiceUnavailable(format!("{service} server error {status}: {text}"))
        }
        status if status.is_client_error() => {
            Error::InvalidRequest(format!("{service} rejected request {status}: {text}"))
        }
        _ => Error::HttpError(format!("{service} error {status}: {text}")),
    }
}

fn deserialize_body<R>(service: Service, path: &str, status: StatusCode, bytes: &[u8]) -> Result<R>
where
    R: DeserializeOwned,
{
    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        serde_json::from_value(serde_json::Value::Null).map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse empty {service} response for `{path}`: {err}"
            ))
        })
    } else {
        serde_json::from_slice(bytes).map_err(|err| {
            Error::ParseError(format!(
                "Failed to parse {service} response for `{path}`: {err}"
            ))
        })
    }
}
