//! Bearer token credentials.
//!
//! Token acquisition is left to the caller's environment; the tools only need a
//! ready-made token per request.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::error::{Error, Result};

/// Source of bearer tokens for authenticated requests.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Return a token valid for the next request.
    ///
    /// # Errors
    ///
    /// Returns an error if no token can be produced.
    async fn token(&self) -> Result<SecretString>;
}

/// Credential that always hands out the same token.
pub struct StaticTokenCredential {
    token: SecretString,
}

impl StaticTokenCredential {
    /// Wrap an existing token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    /// Read the token from environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the variable is unset or empty.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(token) if !token.trim().is_empty() => Ok(Self::new(token.trim())),
            _ => Err(Error::ConfigError(format!(
                "Environment variable {var} must hold an access token"
            ))),
        }
    }
}

impl fmt::Debug for StaticTokenCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenCredential")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn token(&self) -> Result<SecretString> {
        Ok(SecretString::from(self.token.expose_secret().to_owned()))
    }
}
