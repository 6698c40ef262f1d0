//! Configuration management for Beacon skill

pub mod file;

use std::time::Duration;

use secrecy::SecretString;

pub use file::SkillConfigFile;

/// Perplexity chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";

/// Model used for answers
pub const DEFAULT_MODEL: &str = "sonar-pro";

/// Upper bound on a single completion request
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Default HTTP server port
pub const DEFAULT_PORT: u16 = 18790;

/// Beacon skill configuration
#[derive(Debug)]
pub struct Config {
    /// Completion API configuration
    pub upstream: UpstreamConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

/// Completion API configuration
///
/// Passed by value into [`crate::upstream::UpstreamClient`]; nothing reads
/// the environment after startup.
#[derive(Debug)]
pub struct UpstreamConfig {
    /// Bearer token (from `PERPLEXITY_API_KEY`). `None` is a valid,
    /// recoverable state: the skill answers with a "not configured" sentence.
    pub api_key: Option<SecretString>,

    /// Chat completions endpoint URL
    pub endpoint: String,

    /// Model identifier sent with each request
    pub model: String,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl UpstreamConfig {
    /// Set the API key; empty or blank keys count as missing
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = non_blank(api_key.into()).map(SecretString::from);
        self
    }

    /// Override the endpoint URL
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether a credential is present
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl Config {
    /// Load configuration from the config file and the process environment
    ///
    /// Environment variables take precedence over the file. A missing API key
    /// is logged but not fatal.
    #[must_use]
    pub fn load() -> Self {
        let file = file::load_config_file();
        let config = Self::from_sources(file, |key| std::env::var(key).ok());

        if !config.upstream.is_configured() {
            tracing::warn!("PERPLEXITY_API_KEY not set, questions will not be answered");
        }

        config
    }

    /// Build configuration from a parsed config file and an environment lookup
    ///
    /// Later sources win: defaults, then file, then environment.
    #[must_use]
    pub fn from_sources<F>(file: SkillConfigFile, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = UpstreamConfig::default();

        let api_key = env("PERPLEXITY_API_KEY")
            .and_then(non_blank)
            .or_else(|| file.upstream.api_key.and_then(non_blank))
            .map(SecretString::from);

        let endpoint = env("PERPLEXITY_ENDPOINT")
            .and_then(non_blank)
            .or(file.upstream.endpoint)
            .unwrap_or(defaults.endpoint);

        let model = env("PERPLEXITY_MODEL")
            .and_then(non_blank)
            .or(file.upstream.model)
            .unwrap_or(defaults.model);

        let timeout_secs = parse_env(&env, "PERPLEXITY_TIMEOUT_SECS")
            .or(file.upstream.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let port = parse_env(&env, "BEACON_SKILL_PORT")
            .or_else(|| parse_env(&env, "PORT"))
            .or(file.server.port)
            .unwrap_or(DEFAULT_PORT);

        Self {
            upstream: UpstreamConfig {
                api_key,
                endpoint,
                model,
                timeout: Duration::from_secs(timeout_secs),
            },
            server: ServerConfig { port },
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse a numeric env var, ignoring (and logging) garbage
fn parse_env<F, T>(env: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid numeric environment value");
            None
        }
    }
}
