//! Environment configuration of the movies API.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use stratus_core::credentials::StaticTokenCredential;
use stratus_core::Error;
use validator::Validate;

use crate::store::DocumentDbAuth;
use crate::Result;

/// Document database account endpoint
pub const ACCOUNT_URI_VAR: &str = "ACCOUNT_URI";
/// Document database account master key
pub const ACCOUNT_KEY_VAR: &str = "ACCOUNT_KEY";
/// Document database access token, used when no master key is set
pub const ACCOUNT_TOKEN_VAR: &str = "ACCOUNT_TOKEN";
/// Language model API key
pub const COHERE_API_KEY_VAR: &str = "COHERE_API_KEY";
/// Optional language model endpoint override
pub const COHERE_ENDPOINT_VAR: &str = "COHERE_ENDPOINT";
/// Database name
pub const DATABASE_NAME_VAR: &str = "DATABASE_NAME";
/// Container name
pub const CONTAINER_NAME_VAR: &str = "CONTAINER_NAME";
/// Listen address
pub const BIND_ADDR_VAR: &str = "BIND_ADDR";

/// Default database name
pub const DEFAULT_DATABASE: &str = "movies";
/// Default container name
pub const DEFAULT_CONTAINER: &str = "movie-info";
/// Default language model endpoint
pub const DEFAULT_COHERE_ENDPOINT: &str = "https://api.cohere.com/";
/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:7071";

/// Credential for the document database account.
#[derive(Clone)]
pub enum AccountCredential {
    /// Master key, signed into every request
    Key(SecretString),
    /// Entra ID access token
    Token(SecretString),
}

impl AccountCredential {
    /// Request authorization the store should use.
    #[must_use]
    pub fn to_auth(&self) -> DocumentDbAuth {
        match self {
            Self::Key(key) => DocumentDbAuth::MasterKey(key.clone()),
            Self::Token(token) => DocumentDbAuth::Token(Arc::new(StaticTokenCredential::new(
                token.expose_secret(),
            ))),
        }
    }
}

impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(_) => f.write_str("Key([REDACTED])"),
            Self::Token(_) => f.write_str("Token([REDACTED])"),
        }
    }
}

/// Settings of the movies API.
#[derive(Clone, Validate)]
pub struct MoviesConfig {
    /// Document database account endpoint
    #[validate(url)]
    pub account_uri: String,

    /// Document database credential
    pub account_credential: AccountCredential,

    /// Language model API key
    pub cohere_api_key: SecretString,

    /// Language model endpoint
    #[validate(url)]
    pub cohere_endpoint: String,

    /// Database holding the movies
    #[validate(length(min = 1, max = 255))]
    pub database: String,

    /// Container holding the movies
    #[validate(length(min = 1, max = 255))]
    pub container: String,

    /// Listen address
    pub bind_addr: SocketAddr,
}

impl MoviesConfig {
    /// Load the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required variable is missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            non_empty(key).ok_or_else(|| Error::ConfigError(format!("{key} must be set")))
        };

        let bind_addr = non_empty(BIND_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::ConfigError(format!("Invalid {BIND_ADDR_VAR}: {e}")))?;

        let account_credential = match (non_empty(ACCOUNT_KEY_VAR), non_empty(ACCOUNT_TOKEN_VAR)) {
            (Some(key), _) => AccountCredential::Key(SecretString::from(key)),
            (None, Some(token)) => AccountCredential::Token(SecretString::from(token)),
            (None, None) => {
                return Err(Error::ConfigError(format!(
                    "{ACCOUNT_KEY_VAR} or {ACCOUNT_TOKEN_VAR} must be set"
                )))
            }
        };

        let config = Self {
            account_uri: required(ACCOUNT_URI_VAR)?,
            account_credential,
            cohere_api_key: SecretString::from(required(COHERE_API_KEY_VAR)?),
            cohere_endpoint: non_empty(COHERE_ENDPOINT_VAR)
                .unwrap_or_else(|| DEFAULT_COHERE_ENDPOINT.to_string()),
            database: non_empty(DATABASE_NAME_VAR).unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            container: non_empty(CONTAINER_NAME_VAR)
                .unwrap_or_else(|| DEFAULT_CONTAINER.to_string()),
            bind_addr,
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(config)
    }
}

impl fmt::Debug for MoviesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoviesConfig")
            .field("account_uri", &self.account_uri)
            .field("account_credential", &self.account_credential)
            .field("cohere_api_key", &"[REDACTED]")
            .field("cohere_endpoint", &self.cohere_endpoint)
            .field("database", &self.database)
            .field("container", &self.container)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}
