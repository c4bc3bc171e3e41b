//! Configuration loading, validation, and management for DocQuery.
//!
//! Loads configuration from `~/.docquery/config.toml` (or an explicit path)
//! with environment variable overrides. Everything the query pipeline needs
//! (model, instructions, collaborator endpoints and credentials) lives here
//! and is validated before any client is built.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Providers that run locally and need no API key.
const LOCAL_PROVIDERS: &[&str] = &["ollama", "vllm", "llamacpp", "llama.cpp"];

/// The root configuration structure.
///
/// Maps directly to `~/.docquery/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion provider (OpenAI-compatible)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Completion model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Completion API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Sampling temperature; the provider default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// HTTP timeout for both collaborators
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Query agent settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Vector-search settings
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Web gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("agent", &self.agent)
            .field("vector_store", &self.vector_store)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// The model's total context window, in tokens
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,

    /// Share of the context window the prompt may use
    #[serde(default = "default_context_fraction")]
    pub context_fraction: f64,

    /// Fixed system instruction
    #[serde(default = "default_system_content")]
    pub system_content: String,

    /// Fixed assistant instruction
    #[serde(default)]
    pub assistant_content: String,

    /// Chunks requested per query
    #[serde(default = "default_num_chunks")]
    pub num_chunks: usize,

    /// Token counting: "auto", "cl100k_base", "o200k_base" or "heuristic"
    #[serde(default = "default_tokenizer")]
    pub tokenizer: String,
}

fn default_max_context_length() -> usize {
    4096
}
fn default_context_fraction() -> f64 {
    0.5
}
fn default_system_content() -> String {
    "Answer the query using the context provided. Be succinct.".into()
}
fn default_num_chunks() -> usize {
    5
}
fn default_tokenizer() -> String {
    "auto".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_context_length: default_max_context_length(),
            context_fraction: default_context_fraction(),
            system_content: default_system_content(),
            assistant_content: String::new(),
            num_chunks: default_num_chunks(),
            tokenizer: default_tokenizer(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Weaviate endpoint, e.g. `https://my-cluster.weaviate.network`
    #[serde(default)]
    pub url: String,

    /// Weaviate API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Key forwarded to Weaviate's vectorizer module (`X-OpenAI-Api-Key`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_api_key: Option<String>,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_text_field")]
    pub text_field: String,

    #[serde(default = "default_source_field")]
    pub source_field: String,

    /// Drop matches further than this distance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f32>,
}

fn default_collection() -> String {
    "ScikitLearnDocumentation".into()
}
fn default_text_field() -> String {
    "text".into()
}
fn default_source_field() -> String {
    "source".into()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            inference_api_key: None,
            collection: default_collection(),
            text_field: default_text_field(),
            source_field: default_source_field(),
            max_distance: None,
        }
    }
}

impl std::fmt::Debug for VectorStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStoreConfig")
            .field("url", &self.url)
            .field("api_key", &redact(&self.api_key))
            .field("inference_api_key", &redact(&self.inference_api_key))
            .field("collection", &self.collection)
            .field("text_field", &self.text_field)
            .field("source_field", &self.source_field)
            .field("max_distance", &self.max_distance)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Base URL that source file names are appended to
    #[serde(default = "default_source_link")]
    pub source_link: String,

    /// Page title of the web UI
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_source_link() -> String {
    "https://scikit-learn.org/stable/modules/generated/".into()
}
fn default_title() -> String {
    "Scikit-Learn Documentation Search".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            source_link: default_source_link(),
            title: default_title(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or the default path when `None`.
    ///
    /// Environment variables override the file:
    /// - `DOCQUERY_API_KEY`, then `OPENAI_API_KEY` — completion key
    /// - `DOCQUERY_MODEL` — completion model
    /// - `WEAVIATE_URL`, `WEAVIATE_API_KEY` — vector store endpoint and key
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_dir().join("config.toml"),
        };
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("DOCQUERY_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("DOCQUERY_MODEL") {
            self.model = model;
        }
        if let Some(url) = lookup("WEAVIATE_URL") {
            self.vector_store.url = url;
        }
        if let Some(key) = lookup("WEAVIATE_API_KEY") {
            self.vector_store.api_key = Some(key);
        }
        // Weaviate's OpenAI vectorizer reuses the completion key unless told otherwise.
        if self.vector_store.inference_api_key.is_none() && !self.is_local_provider() {
            self.vector_store.inference_api_key = self.api_key.clone();
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".docquery")
    }

    /// Validate value ranges and required names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(
                    "temperature must be between 0.0 and 2.0".into(),
                ));
            }
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.agent.max_context_length == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_context_length must be > 0".into(),
            ));
        }

        if !(self.agent.context_fraction > 0.0 && self.agent.context_fraction <= 1.0) {
            return Err(ConfigError::ValidationError(
                "agent.context_fraction must be in (0.0, 1.0]".into(),
            ));
        }

        if self.agent.num_chunks == 0 {
            return Err(ConfigError::ValidationError(
                "agent.num_chunks must be >= 1".into(),
            ));
        }

        let vs = &self.vector_store;
        for (name, value) in [
            ("vector_store.collection", &vs.collection),
            ("vector_store.text_field", &vs.text_field),
            ("vector_store.source_field", &vs.source_field),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{name} must not be empty")));
            }
        }

        if let Some(d) = vs.max_distance {
            if !d.is_finite() || d < 0.0 {
                return Err(ConfigError::ValidationError(
                    "vector_store.max_distance must be a finite value >= 0".into(),
                ));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Check that every credential and endpoint needed to reach the
    /// collaborators is present. Call before building clients.
    pub fn validate_credentials(&self) -> Result<(), ConfigError> {
        if self.vector_store.url.trim().is_empty() {
            return Err(ConfigError::MissingCredential(
                "vector_store.url (or WEAVIATE_URL)".into(),
            ));
        }
        if !self.is_local_provider() && self.api_key.is_none() {
            return Err(ConfigError::MissingCredential(
                "api_key (or DOCQUERY_API_KEY / OPENAI_API_KEY)".into(),
            ));
        }
        Ok(())
    }

    /// Whether the configured provider runs locally without an API key.
    pub fn is_local_provider(&self) -> bool {
        LOCAL_PROVIDERS.contains(&self.provider.as_str())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            api_url: None,
            temperature: None,
            request_timeout_secs: default_request_timeout_secs(),
            agent: AgentConfig::default(),
            vector_store: VectorStoreConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing credential or endpoint: {0}")]
    MissingCredential(String),
}
