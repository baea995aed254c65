//! Plot summaries from a hosted language model.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use stratus_core::client::{
    RetryPolicy, ServiceClient, ServiceClientBuilder, LANGUAGE_MODEL_DEFAULT_TIMEOUT,
};
use stratus_core::credentials::TokenCredential;
use stratus_core::types::Service;
use stratus_core::Error;

use crate::Result;

const USER_AGENT: &str = concat!("stratus-movies/", env!("CARGO_PKG_VERSION"));

/// Chat model asked for summaries.
pub const SUMMARY_MODEL: &str = "command-r-plus-08-2024";
/// System message constraining the answer length.
pub const SYSTEM_MESSAGE: &str = "You respond concisely, in 2-3 sentences";

const CHAT_PATH: &str = "v2/chat";

/// Writes a short plot summary of a movie.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `title`, released in `year`.
    async fn summarize(&self, title: &str, year: &str) -> Result<String>;
}

/// User message asking for the summary.
#[must_use]
pub fn summary_instruction(title: &str, year: &str) -> String {
    format!("Write a plot summary for the movie {title} released in {year}")
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Summarizer backed by the Cohere chat API.
#[derive(Debug, Clone)]
pub struct CohereSummarizer {
    inner: ServiceClient,
}

impl CohereSummarizer {
    /// Create a summarizer for `endpoint` authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a valid URL.
    pub fn new(endpoint: impl AsRef<str>, api_key: Arc<dyn TokenCredential>) -> Result<Self> {
        Self::with_retry_policy(endpoint, api_key, RetryPolicy::new())
    }

    /// Like [`CohereSummarizer::new`] with an explicit retry policy.
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoint` is not a valid URL.
    pub fn with_retry_policy(
        endpoint: impl AsRef<str>,
        api_key: Arc<dyn TokenCredential>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let inner = ServiceClientBuilder::new(
            Service::LanguageModel,
            endpoint,
            Duration::from_secs(LANGUAGE_MODEL_DEFAULT_TIMEOUT),
        )?
        .with_user_agent(USER_AGENT)
        .with_credential(api_key)
        .with_retry_policy(retry)
        .build()?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl Summarizer for CohereSummarizer {
    async fn summarize(&self, title: &str, year: &str) -> Result<String> {
        let request = ChatRequest {
            model: SUMMARY_MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: summary_instruction(title, year),
                },
            ],
        };

        let response: ChatResponse = self
            .inner
            .send_json(Method::POST, CHAT_PATH, Some(&request), &[])
            .await?;

        response
            .message
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| Error::IncompleteResponse("chat response carried no text".to_string()))
    }
}
