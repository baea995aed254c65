//! Environment configuration of the weather CLI.

use std::fmt;

use secrecy::SecretString;
use stratus_core::Error;

use crate::Result;

/// Weather service API key
pub const API_KEY_VAR: &str = "WEATHERBIT_API_KEY";
/// Optional endpoint override
pub const ENDPOINT_VAR: &str = "WEATHERBIT_ENDPOINT";
/// Default weather service endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.weatherbit.io/";

/// Settings of the weather CLI.
#[derive(Clone)]
pub struct WeatherConfig {
    /// API key sent as the `key` query parameter
    pub api_key: SecretString,
    /// Service root
    pub endpoint: String,
}

impl WeatherConfig {
    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the API key is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the API key is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = non_empty(API_KEY_VAR)
            .ok_or_else(|| Error::ConfigError(format!("{API_KEY_VAR} must be set")))?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            endpoint: non_empty(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        })
    }
}

impl fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn key_required() {
        let err = WeatherConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err,
            Error::ConfigError("WEATHERBIT_API_KEY must be set".to_string())
        );
        assert!(WeatherConfig::from_lookup(lookup(&[(API_KEY_VAR, "  ")])).is_err());
    }

    #[test]
    fn defaults_and_overrides() {
        let config = WeatherConfig::from_lookup(lookup(&[(API_KEY_VAR, "abc ")])).unwrap();
        assert_eq!(config.api_key.expose_secret(), "abc");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);

        let config = WeatherConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "abc"),
            (ENDPOINT_VAR, "http://localhost:9000/"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000/");
        assert!(!format!("{config:?}").contains("abc"));
    }
}
