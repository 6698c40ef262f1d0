//! Perplexity chat completions client
//!
//! [`UpstreamClient::ask`] never fails. Every outcome, including missing
//! configuration and network trouble, becomes a sentence the voice platform
//! can speak. Diagnostic detail goes to the log instead.

mod http;

pub use http::ReqwestTransport;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::UpstreamConfig;
use crate::sanitize::clean_text;
use crate::Result;

/// Spoken when no API key is configured
pub const NOT_CONFIGURED: &str = "Perplexity API key is not configured. \
    Please set the PERPLEXITY_API_KEY environment variable.";

/// Spoken when the reply has no choices
pub const NO_USEFUL_RESPONSE: &str = "I couldn't get a useful response from Perplexity.";

/// Spoken when the first choice has no content
pub const NO_CONTENT: &str = "Perplexity didn't return any content for this question.";

/// Spoken on HTTP 401
pub const AUTH_FAILED: &str = "Authentication with Perplexity failed. Please check your API key.";

/// Spoken on any other HTTP error status
pub const PROBLEM_CONTACTING: &str = "I had a problem contacting Perplexity.";

/// Spoken when the endpoint can't be reached
pub const UNREACHABLE: &str = "I couldn't reach Perplexity right now. Please try again.";

/// Spoken for anything unexpected
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong while processing your request.";

/// An outbound JSON POST
pub struct HttpRequest {
    pub url: String,
    pub bearer: String,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

/// A received HTTP response, whatever its status
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase, e.g. "Unauthorized"
    pub reason: Option<String>,
    pub body: String,
}

/// Failure before a response was received
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The request exceeded its timeout
    #[error("request timed out")]
    Timeout,

    /// DNS, TCP or TLS failure
    #[error("connection failed: {0}")]
    Connect(String),

    /// Anything else the transport reports
    #[error("transport failure: {0}")]
    Other(String),
}

/// Capability to POST JSON and read the response
///
/// Production code uses [`ReqwestTransport`]; tests substitute fakes.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return the response for any status code
    ///
    /// # Errors
    ///
    /// Returns error only if no response was received
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Why a completion produced no answer
#[derive(Debug)]
enum Failure {
    Status(HttpResponse),
    Transport(TransportError),
    Unexpected(String),
}

impl Failure {
    fn spoken(&self) -> &'static str {
        match self {
            Self::Status(response) if response.status == 401 => AUTH_FAILED,
            Self::Status(_) => PROBLEM_CONTACTING,
            Self::Transport(TransportError::Timeout | TransportError::Connect(_)) => UNREACHABLE,
            Self::Transport(TransportError::Other(_)) | Self::Unexpected(_) => {
                SOMETHING_WENT_WRONG
            }
        }
    }

    fn log(&self) {
        match self {
            Self::Status(response) => tracing::error!(
                status = response.status,
                reason = response.reason.as_deref().unwrap_or_default(),
                body = %response.body,
                "Perplexity API error"
            ),
            Self::Transport(e) => tracing::error!(error = %e, "Perplexity request failed"),
            Self::Unexpected(e) => tracing::error!(error = %e, "unexpected error calling Perplexity"),
        }
    }
}

/// Answers questions with the Perplexity chat completions API
#[derive(Clone)]
pub struct UpstreamClient {
    config: Arc<UpstreamConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl UpstreamClient {
    /// Create a client using the reqwest transport
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client can't be built
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        Ok(Self::with_transport(config, Arc::new(ReqwestTransport::new()?)))
    }

    /// Create a client with a custom transport
    #[must_use]
    pub fn with_transport(config: UpstreamConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Whether an API key is configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Model sent with each request
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Ask a question and get a speakable answer
    ///
    /// Without an API key this returns [`NOT_CONFIGURED`] without touching
    /// the network.
    pub async fn ask(&self, query: &str) -> String {
        let Some(api_key) = &self.config.api_key else {
            tracing::warn!("no Perplexity API key configured");
            return NOT_CONFIGURED.to_string();
        };

        match self.complete(api_key, query).await {
            Ok(text) => text,
            Err(failure) => {
                failure.log();
                failure.spoken().to_string()
            }
        }
    }

    async fn complete(&self, api_key: &SecretString, query: &str) -> std::result::Result<String, Failure> {
        let payload = ChatCompletionRequest {
            model: &self.config.model,
            messages: [Message {
                role: "user",
                content: query,
            }],
        };
        let body =
            serde_json::to_value(&payload).map_err(|e| Failure::Unexpected(e.to_string()))?;

        tracing::debug!(model = %self.config.model, query_chars = query.chars().count(), "asking Perplexity");

        let response = self
            .transport
            .post_json(HttpRequest {
                url: self.config.endpoint.clone(),
                bearer: api_key.expose_secret().to_string(),
                body,
                timeout: self.config.timeout,
            })
            .await
            .map_err(Failure::Transport)?;

        if !(200..300).contains(&response.status) {
            return Err(Failure::Status(response));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&response.body)
            .map_err(|e| Failure::Unexpected(format!("failed to parse response: {e}")))?;

        let Some(choice) = parsed.choices.unwrap_or_default().into_iter().next() else {
            tracing::warn!("Perplexity returned no choices");
            return Ok(NO_USEFUL_RESPONSE.to_string());
        };

        let content = choice
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty());
        let Some(content) = content else {
            tracing::warn!("Perplexity returned an empty message");
            return Ok(NO_CONTENT.to_string());
        };

        tracing::info!(content_chars = content.chars().count(), "Perplexity answered");
        Ok(clean_text(&content))
    }
}
