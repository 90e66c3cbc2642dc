//! Configuration loading and validation for Shastho.
//!
//! Loads configuration from a `config.json` colocated with the process,
//! with the `GROQ_API_KEY` environment variable as an override. A missing
//! API key is fatal at startup; a missing document file is not (the
//! gateway degrades to an empty knowledge index).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to `config.json`. The credential field accepts both the
/// idiomatic `groq_api_key` and the uppercase `GROQ_API_KEY` used by the
/// reference deployment.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Groq API key
    #[serde(alias = "GROQ_API_KEY", default, skip_serializing_if = "Option::is_none")]
    pub groq_api_key: Option<String>,

    /// Model served by the completion API
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default = "default_max_completion_tokens")]
    pub max_completion_tokens: u32,

    /// Path of the reference document to chunk at startup
    #[serde(default = "default_document_path")]
    pub document_path: PathBuf,

    /// Maximum estimated tokens per chunk
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    /// How many chunks to embed in the system prompt
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// How many recent turns to forward upstream
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_model() -> String {
    "gemma2-9b-it".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_completion_tokens() -> u32 {
    700
}
fn default_document_path() -> PathBuf {
    "book.txt".into()
}
fn default_max_chunk_size() -> usize {
    1000
}
fn default_top_k() -> usize {
    2
}
fn default_history_window() -> usize {
    10
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("groq_api_key", &redact(&self.groq_api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_completion_tokens", &self.max_completion_tokens)
            .field("document_path", &self.document_path)
            .field("max_chunk_size", &self.max_chunk_size)
            .field("top_k", &self.top_k)
            .field("history_window", &self.history_window)
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_completion_tokens: default_max_completion_tokens(),
            document_path: default_document_path(),
            max_chunk_size: default_max_chunk_size(),
            top_k: default_top_k(),
            history_window: default_history_window(),
            gateway: GatewayConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Errors raised while loading or validating configuration.
///
/// All of these abort startup — the process must not serve without a
/// usable credential.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Cannot parse config file {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Missing required config key: {0}")]
    MissingKey(&'static str),
}

impl AppConfig {
    /// Load configuration from the default path (`config.json` in the
    /// current working directory), then apply environment overrides.
    ///
    /// `GROQ_API_KEY` in the environment takes priority over the file.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(Path::new("config.json"))?;

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                config.groq_api_key = Some(key);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// A missing file yields defaults (the env var can still supply the
    /// key); a present-but-invalid file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Validate that the configuration is servable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.groq_api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingKey("GROQ_API_KEY")),
        }
    }
}
