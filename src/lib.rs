//! Beacon Skill - voice assistant skill backed by Perplexity
//!
//! This library turns a voice-assistant event into a spoken answer:
//! - Event parsing and query extraction from intent slots
//! - Perplexity chat completions with failures mapped to spoken apologies
//! - Markdown cleanup for text-to-speech
//! - The platform's fixed response envelope
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Voice platform (HTTPS POST)             │
//! └────────────────────┬────────────────────────────────┘
//!                      │ event JSON
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Beacon Skill                        │
//! │   Dispatch  │  Slots  │  Upstream  │  Sanitize       │
//! └────────────────────┬────────────────────────────────┘
//!                      │ chat completion
//! ┌────────────────────▼────────────────────────────────┐
//! │            Perplexity /chat/completions              │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod response;
pub mod sanitize;
pub mod skill;
pub mod upstream;

pub use config::{Config, UpstreamConfig};
pub use error::{Error, Result};
pub use event::{Slot, SkillRequest, Slots};
pub use extract::extract_query;
pub use response::{SpeechResponse, speak};
pub use sanitize::clean_text;
pub use skill::Skill;
pub use upstream::{HttpRequest, HttpResponse, HttpTransport, TransportError, UpstreamClient};
