//! Inbound voice-assistant events
//!
//! The voice platform posts a loosely-shaped JSON document. It is parsed once
//! into [`SkillRequest`] so the dispatcher can match exhaustively instead of
//! probing nested keys.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::{Error, Result};

/// Request type sent when the user opens the skill without a question
pub const LAUNCH_REQUEST: &str = "LaunchRequest";

/// Request type sent when the user asks something
pub const INTENT_REQUEST: &str = "IntentRequest";

/// Built-in intent sent when the platform couldn't match an utterance
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

/// A parsed inbound event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillRequest {
    /// The skill was opened
    Launch,

    /// An intent with its slots, in the order the platform sent them
    Intent { name: String, slots: Slots },

    /// Anything else (`SessionEndedRequest`, unknown types, missing type)
    Other { kind: Option<String> },
}

/// Slot name to slot, preserving insertion order
pub type Slots = IndexMap<String, Slot>;

/// A single slot as sent by the platform
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    /// Recognized value, absent when the user didn't fill the slot
    pub value: Option<String>,
}

impl Slot {
    /// Read a slot entry, treating anything but a string `value` as unfilled
    #[must_use]
    pub fn from_value(slot: &Value) -> Self {
        Self {
            value: slot.get("value").and_then(Value::as_str).map(ToString::to_string),
        }
    }

    /// The slot value if present and non-empty
    #[must_use]
    pub fn non_empty_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    request: Option<RawRequest>,
}

#[derive(Deserialize)]
struct RawRequest {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    intent: Option<Value>,
}

impl SkillRequest {
    /// Parse an inbound event
    ///
    /// Missing pieces are tolerated: no `request.type` yields [`Self::Other`],
    /// and an intent without a name or slots gets empty ones. Intent contents
    /// are read leniently, so a malformed slot only leaves that slot unfilled.
    ///
    /// # Errors
    ///
    /// Returns error if the event isn't an object or `request` has the wrong
    /// shape (e.g. `type` is a number)
    pub fn from_event(event: &serde_json::Value) -> Result<Self> {
        let raw = RawEvent::deserialize(event)
            .map_err(|e| Error::Event(format!("malformed event: {e}")))?;

        let Some(request) = raw.request else {
            return Ok(Self::Other { kind: None });
        };

        Ok(match request.kind {
            Some(kind) if kind == LAUNCH_REQUEST => Self::Launch,
            Some(kind) if kind == INTENT_REQUEST => {
                let intent = request.intent.unwrap_or_default();
                Self::Intent {
                    name: intent
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    slots: parse_slots(&intent),
                }
            }
            kind => Self::Other { kind },
        })
    }

    /// Short label for logging
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Launch => LAUNCH_REQUEST,
            Self::Intent { .. } => INTENT_REQUEST,
            Self::Other { kind } => kind.as_deref().unwrap_or("unknown"),
        }
    }
}

fn parse_slots(intent: &Value) -> Slots {
    let Some(slots) = intent.get("slots").and_then(Value::as_object) else {
        return Slots::new();
    };

    slots
        .iter()
        .map(|(name, slot)| (name.clone(), Slot::from_value(slot)))
        .collect()
}
