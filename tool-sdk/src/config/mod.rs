//! Configuration management for service clients
//!
//! This module provides utilities for loading and validating configuration
//! for the backend clients, with support for environment variables.

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Look up a raw value; blank values count as unset
    fn lookup(&self, key: &str) -> Option<String>;

    /// Name of the key as the user would set it (used in error messages)
    fn describe_key(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get a required string configuration value
    fn get_string(&self, key: &str) -> Result<String> {
        self.lookup(key).ok_or_else(|| {
            ServiceError::configuration(format!("{} is required", self.describe_key(key)))
        })
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }

    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value.trim().parse::<i64>().map_err(|e| {
            ServiceError::configuration(format!(
                "Invalid integer for {}: {} ({})",
                self.describe_key(key),
                value,
                e
            ))
        })
    }

    /// Get an integer configuration value, falling back to `default` when unset.
    ///
    /// A value that is set but not an integer is an error, not a fallback.
    fn get_int_or(&self, key: &str, default: i64) -> Result<i64> {
        match self.lookup(key) {
            Some(_) => self.get_int(key),
            None => Ok(default),
        }
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        // Uppercase and replace non-alphanumeric with underscores
        env_key.push_str(&key.to_uppercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_"));

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn lookup(&self, key: &str) -> Option<String> {
        env::var(self.format_key(key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn describe_key(&self, key: &str) -> String {
        self.format_key(key)
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    /// Configuration values
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}

/// Global default configuration provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new().with_prefix("ADVISOR")));

/// Trait for service-specific configuration
pub trait ServiceConfig: Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

fn require_positive_timeout(service: &str, seconds: i64) -> Result<u64> {
    if seconds <= 0 {
        return Err(ServiceError::configuration(format!(
            "{} timeout must be positive, got {}",
            service, seconds
        )));
    }
    Ok(seconds as u64)
}

fn require_http_url(service: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(ServiceError::configuration(format!("{} base URL is required", service)));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ServiceError::configuration(format!(
            "{} base URL must start with http:// or https://, got {}",
            service, url
        )));
    }
    Ok(())
}

/// Configuration for the OpenAI-compatible completion and embedding server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Server root; `/v1/...` paths are appended to it
    pub base_url: String,

    /// Model used for chat completions
    pub model: String,

    /// Model used for embeddings
    pub embedding_model: String,

    /// Optional bearer token
    pub api_key: Option<String>,

    /// Timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            model: "qwen2.5-7b-instruct".to_string(),
            embedding_model: "qwen2.5-7b-instruct".to_string(),
            api_key: None,
            timeout_seconds: 60,
        }
    }
}

impl LlmConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let defaults = Self::default();
        let model = provider.get_string_or("llm_model", &defaults.model);
        let config = Self {
            base_url: provider.get_string_or("llm_base_url", &defaults.base_url),
            embedding_model: provider.get_string_or("llm_embedding_model", &model),
            model,
            api_key: provider.lookup("llm_api_key"),
            timeout_seconds: require_positive_timeout(
                "llm",
                provider.get_int_or("llm_timeout_seconds", defaults.timeout_seconds as i64)?,
            )?,
        };

        config.validate()?;
        Ok(config)
    }
}

impl ServiceConfig for LlmConfig {
    fn validate(&self) -> Result<()> {
        require_http_url("llm", &self.base_url)?;
        if self.model.trim().is_empty() {
            return Err(ServiceError::configuration("llm model is required"));
        }
        if self.embedding_model.trim().is_empty() {
            return Err(ServiceError::configuration("llm embedding model is required"));
        }
        Ok(())
    }

    fn service_name(&self) -> &str {
        "llm"
    }
}

/// Configuration for the Qdrant vector-search backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QdrantConfig {
    /// REST endpoint (port 6333 by default, not the gRPC port)
    pub url: String,

    /// Optional `api-key` header value
    pub api_key: Option<String>,

    /// Collection holding the passages
    pub collection: String,

    /// Timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6333".to_string(),
            api_key: None,
            collection: "advisor_passages".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl QdrantConfig {
    /// Load configuration from a config provider
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            url: provider.get_string_or("qdrant_url", &defaults.url),
            api_key: provider.lookup("qdrant_api_key"),
            collection: provider.get_string_or("qdrant_collection", &defaults.collection),
            timeout_seconds: require_positive_timeout(
                "qdrant",
                provider.get_int_or("qdrant_timeout_seconds", defaults.timeout_seconds as i64)?,
            )?,
        };

        config.validate()?;
        Ok(config)
    }
}

impl ServiceConfig for QdrantConfig {
    fn validate(&self) -> Result<()> {
        require_http_url("qdrant", &self.url)?;
        if self.collection.trim().is_empty() {
            return Err(ServiceError::configuration("qdrant collection is required"));
        }
        Ok(())
    }

    fn service_name(&self) -> &str {
        "qdrant"
    }
}

/// Configuration for a remote tool backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolBackendConfig {
    /// Server root; tools are invoked at `{base_url}/v1/tools/{name}`
    pub base_url: String,

    /// Timeout in seconds
    pub timeout_seconds: u64,
}

impl ToolBackendConfig {
    /// Load configuration from a config provider.
    ///
    /// Returns `None` when no tool backend address is configured.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Option<Self>> {
        let Some(base_url) = provider.lookup("tools_base_url") else {
            return Ok(None);
        };

        let config = Self {
            base_url,
            timeout_seconds: require_positive_timeout(
                "tools",
                provider.get_int_or("tools_timeout_seconds", 30)?,
            )?,
        };

        config.validate()?;
        Ok(Some(config))
    }
}

impl ServiceConfig for ToolBackendConfig {
    fn validate(&self) -> Result<()> {
        require_http_url("tools", &self.base_url)
    }

    fn service_name(&self) -> &str {
        "tools"
    }
}
