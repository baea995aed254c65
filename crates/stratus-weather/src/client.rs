//! Weather service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use stratus_core::client::{
    RetryPolicy, ServiceClient, ServiceClientBuilder, WEATHER_DEFAULT_TIMEOUT,
};
use stratus_core::types::Service;
use stratus_core::Error;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::models::{CurrentResponse, Observation};
use crate::Result;

const USER_AGENT: &str = concat!("stratus-weather/", env!("CARGO_PKG_VERSION"));
const CURRENT_PATH: &str = "v2.0/current";

/// Source of current weather observations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Observations for `city`. An unknown city yields an empty list.
    async fn current(&self, city: &str) -> Result<Vec<Observation>>;
}

/// Error for a non-success status, carrying the message shown to the user.
#[must_use]
pub fn status_error(status: StatusCode) -> Error {
    Error::ExternalServiceError {
        service: Service::Weather.name().to_string(),
        message: format!("API request failed with status code: {}", status.as_u16()),
    }
}

/// Client for the Weatherbit current-conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherbitClient {
    inner: ServiceClient,
    api_key: SecretString,
}

impl WeatherbitClient {
    /// Create a client for `endpoint`. Requests are sent once, without retries.
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a valid URL.
    pub fn new(endpoint: impl AsRef<str>, api_key: SecretString) -> Result<Self> {
        let inner = ServiceClientBuilder::new(
            Service::Weather,
            endpoint,
            Duration::from_secs(WEATHER_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT)
        .with_retry_policy(RetryPolicy::no_retry())
        .build()?;
        Ok(Self { inner, api_key })
    }

    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoint is not a valid URL.
    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.api_key.clone())
    }
}

#[async_trait]
impl WeatherSource for WeatherbitClient {
    async fn current(&self, city: &str) -> Result<Vec<Observation>> {
        let params = [
            ("city", city.to_string()),
            ("key", self.api_key.expose_secret().to_string()),
        ];
        let response = self
            .inner
            .execute_with_retry(
                Method::GET,
                CURRENT_PATH,
                &params,
                |request| request,
                |status, _| status_error(status),
            )
            .await?;

        // No content means no station matched the city.
        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), city, "no observation returned");
            return Ok(Vec::new());
        }

        let bytes = response.bytes().await.map_err(Error::from)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let body: CurrentResponse = serde_json::from_slice(&bytes)?;
        Ok(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WeatherbitClient {
        WeatherbitClient::new(server.uri(), SecretString::from("weather-key")).unwrap()
    }

    #[tokio::test]
    async fn sends_city_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/current"))
            .and(query_param("city", "Lagos"))
            .and(query_param("key", "weather-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "city_name": "Lagos",
                    "temp": 30,
                    "rh": 80,
                    "wind_spd": 3.1,
                    "weather": {"description": "Haze"}
                }],
                "count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let observations = client(&server).current("Lagos").await.unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].weather.description, "Haze");
    }

    #[tokio::test]
    async fn no_content_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/current"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        assert!(client(&server).current("Atlantis").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_status_is_reported_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/current"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).current("Lagos").await.unwrap_err();
        assert_eq!(
            err,
            Error::ExternalServiceError {
                service: "weather".to_string(),
                message: "API request failed with status code: 503".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client(&server).current("Lagos").await.unwrap_err();
        assert!(err.to_string().ends_with("API request failed with status code: 403"));
    }

    #[tokio::test]
    async fn malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).current("Lagos").await.unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
