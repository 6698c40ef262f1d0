//! Voice platform response envelope

use serde::{Deserialize, Serialize};

/// Response format version understood by the platform
pub const RESPONSE_VERSION: &str = "1.0";

/// Output speech type for unformatted text
pub const PLAIN_TEXT: &str = "PlainText";

/// Top-level response returned for every event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechResponse {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl SpeechResponse {
    /// Spoken text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.response.output_speech.text
    }
}

/// Wrap text in the response envelope
///
/// The session always stays open so the user can ask a follow-up.
#[must_use]
pub fn speak(text: impl Into<String>) -> SpeechResponse {
    SpeechResponse {
        version: RESPONSE_VERSION.to_string(),
        response: ResponseBody {
            output_speech: OutputSpeech {
                kind: PLAIN_TEXT.to_string(),
                text: text.into(),
            },
            should_end_session: false,
        },
    }
}
