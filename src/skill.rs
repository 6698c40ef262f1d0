//! Event dispatcher
//!
//! Routes one inbound event to a spoken reply:
//!
//! ```text
//! LaunchRequest ──────────────────────────────▶ greeting
//! IntentRequest ─┬─ AMAZON.FallbackIntent ────▶ clarification
//!                ├─ no query in slots ────────▶ topic prompt
//!                └─ query ─▶ UpstreamClient ──▶ answer
//! anything else ──────────────────────────────▶ farewell
//! ```

use crate::event::{FALLBACK_INTENT, SkillRequest};
use crate::extract::extract_query;
use crate::response::{SpeechResponse, speak};
use crate::upstream::UpstreamClient;

/// Spoken when the skill is opened
pub const GREETING: &str = "Hi, I'm your Perplexity news agent. \
    Ask me something like: what's the latest about OpenAI today?";

/// Spoken when the platform couldn't match the utterance
pub const FALLBACK_PROMPT: &str = "I didn't quite catch that. \
    Try saying something like: tell me the latest about OpenAI.";

/// Spoken when the intent carried no usable slot
pub const NO_TOPIC_PROMPT: &str = "I didn't get the topic. \
    Try saying: tell me the latest about OpenAI.";

/// Spoken for session-ended and unknown requests
pub const FAREWELL: &str = "Goodbye.";

/// Answers voice-assistant events
#[derive(Clone)]
pub struct Skill {
    upstream: UpstreamClient,
}

impl Skill {
    #[must_use]
    pub const fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// The client used for questions
    #[must_use]
    pub const fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    /// Handle a raw inbound event
    ///
    /// Always returns a well-formed envelope. Events that can't be parsed are
    /// answered like an unknown request type.
    pub async fn handle(&self, event: &serde_json::Value) -> SpeechResponse {
        tracing::info!(event = %event, "incoming event");

        let request = SkillRequest::from_event(event).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "treating unreadable event as unknown request");
            SkillRequest::Other { kind: None }
        });

        self.handle_request(&request).await
    }

    /// Handle a parsed request
    pub async fn handle_request(&self, request: &SkillRequest) -> SpeechResponse {
        match request {
            SkillRequest::Launch => speak(GREETING),
            SkillRequest::Intent { name, .. } if name == FALLBACK_INTENT => speak(FALLBACK_PROMPT),
            SkillRequest::Intent { name, .. } => {
                let Some(query) = extract_query(request) else {
                    tracing::info!(intent = %name, "no query in intent slots");
                    return speak(NO_TOPIC_PROMPT);
                };
                tracing::info!(intent = %name, query = %query, "answering question");
                speak(self.upstream.ask(query).await)
            }
            SkillRequest::Other { kind } => {
                tracing::debug!(kind = kind.as_deref().unwrap_or("unknown"), "ending conversation");
                speak(FAREWELL)
            }
        }
    }
}
