//! Error types for Beacon skill

use thiserror::Error;

/// Result type alias for Beacon skill operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Beacon skill
///
/// None of these reach the voice user. The request path converts every
/// failure into a spoken sentence; these surface only at startup, in the
/// CLI, or in logs.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Inbound event could not be interpreted
    #[error("event error: {0}")]
    Event(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
