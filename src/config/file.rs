//! TOML configuration file loading
//!
//! Supports `~/.config/omni/beacon-skill/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct SkillConfigFile {
    /// Completion API configuration
    #[serde(default)]
    pub upstream: UpstreamFileConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// Completion API configuration
#[derive(Debug, Default, Deserialize)]
pub struct UpstreamFileConfig {
    /// Perplexity API key
    pub api_key: Option<String>,

    /// Model identifier (e.g. "sonar-pro")
    pub model: Option<String>,

    /// Chat completions endpoint URL
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// HTTP server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Port to listen on
    pub port: Option<u16>,
}

/// Load the TOML config file from the standard path
///
/// Returns `SkillConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> SkillConfigFile {
    let Some(path) = config_file_path() else {
        return SkillConfigFile::default();
    };

    if !path.exists() {
        return SkillConfigFile::default();
    }

    match load_from_path(&path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "loaded config file");
            config
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            SkillConfigFile::default()
        }
    }
}

/// Read and parse a config file at an explicit path
///
/// # Errors
///
/// Returns error if the file can't be read or isn't valid TOML
pub fn load_from_path(path: &Path) -> Result<SkillConfigFile> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Return the config file path: `~/.config/omni/beacon-skill/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| {
        d.config_dir()
            .join("omni")
            .join("beacon-skill")
            .join("config.toml")
    })
}
