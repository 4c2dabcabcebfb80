//! config-rs/lib.rs
//! Process configuration for the advisor gateway
//!
//! Every setting is read through a [`ConfigProvider`]; in production that is
//! the `ADVISOR_`-prefixed environment, optionally seeded from a `.env` file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tool_sdk::config::{
    ConfigProvider, ConfigProviderExt, LlmConfig, QdrantConfig, ToolBackendConfig, DEFAULT_PROVIDER,
};
use tool_sdk::ServiceError;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_RAG_TOP_K: i64 = 5;
pub const DEFAULT_SQL_DRIVER: &str = "mysql";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: i64 = 90;
pub const DEFAULT_SHUTDOWN_GRACE_SECONDS: i64 = 10;
pub const SERVICE_NAME: &str = "advisor-gateway";

/// Configuration errors are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Provider(#[from] ServiceError),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" => Ok(LogFormat::Text),
            other => Err(ConfigError::Invalid(format!("unsupported log format: {}", other))),
        }
    }
}

/// What happened to the `.env` file during [`AdvisorConfig::load`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing,
    Unreadable(String),
}

impl EnvFile {
    pub fn from_outcome(outcome: Result<PathBuf, dotenv::Error>) -> Self {
        match outcome {
            Ok(path) => EnvFile::Loaded(path),
            Err(dotenv::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => EnvFile::Missing,
            Err(e) => EnvFile::Unreadable(e.to_string()),
        }
    }

    /// Log the outcome. Call once logging is installed.
    pub fn report(&self) {
        match self {
            EnvFile::Loaded(path) => log::info!("Loaded environment from {}", path.display()),
            EnvFile::Missing => log::debug!("No .env file found, using process environment"),
            EnvFile::Unreadable(reason) => log::warn!("Ignoring unreadable .env file: {}", reason),
        }
    }
}

/// Relational backend for the local tool path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlConfig {
    pub driver: String,
    pub dsn: String,
}

/// Everything the gateway needs to start
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub service_name: String,
    pub http_addr: String,
    pub llm: LlmConfig,
    pub qdrant: QdrantConfig,
    /// Passages to retrieve; non-positive values fall back to the default
    pub rag_top_k: i64,
    /// Remote tool backend, when tools are not run locally
    pub tools: Option<ToolBackendConfig>,
    pub sql: Option<SqlConfig>,
    pub request_timeout_seconds: u64,
    pub shutdown_grace_seconds: u64,
    pub log_format: LogFormat,
}

/// Accepts `host:port` as well as `http://host:port`
fn parse_bind_address(raw: &str) -> Option<SocketAddr> {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or(trimmed);
    without_scheme.trim_end_matches('/').parse().ok()
}

fn non_negative_seconds(key: &str, value: i64) -> Result<u64, ConfigError> {
    u64::try_from(value).map_err(|_| ConfigError::Invalid(format!("{} must not be negative, got {}", key, value)))
}

impl AdvisorConfig {
    /// Load `.env` (if present) and read the environment.
    ///
    /// Nothing is logged here since logging depends on the loaded
    /// configuration; report the returned [`EnvFile`] afterwards.
    pub fn load() -> Result<(Self, EnvFile), ConfigError> {
        let env_file = EnvFile::from_outcome(dotenv::dotenv());
        let config = Self::from_provider(DEFAULT_PROVIDER.as_ref())?;
        Ok((config, env_file))
    }

    /// Read and validate every setting from `provider`
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self, ConfigError> {
        let sql = provider.lookup("sql_dsn").map(|dsn| SqlConfig {
            driver: provider.get_string_or("sql_driver", DEFAULT_SQL_DRIVER),
            dsn,
        });

        let config = Self {
            service_name: SERVICE_NAME.to_string(),
            http_addr: provider.get_string_or("http_addr", DEFAULT_HTTP_ADDR),
            llm: LlmConfig::from_provider(provider)?,
            qdrant: QdrantConfig::from_provider(provider)?,
            rag_top_k: provider.get_int_or("rag_top_k", DEFAULT_RAG_TOP_K)?,
            tools: ToolBackendConfig::from_provider(provider)?,
            sql,
            request_timeout_seconds: non_negative_seconds(
                "request_timeout_seconds",
                provider.get_int_or("request_timeout_seconds", DEFAULT_REQUEST_TIMEOUT_SECONDS)?,
            )?,
            shutdown_grace_seconds: non_negative_seconds(
                "shutdown_grace_seconds",
                provider.get_int_or("shutdown_grace_seconds", DEFAULT_SHUTDOWN_GRACE_SECONDS)?,
            )?,
            log_format: LogFormat::parse(&provider.get_string_or("log_format", "json"))?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;

        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("request timeout must be positive".to_string()));
        }
        if self.llm.timeout_seconds == 0 || self.qdrant.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("backend timeouts must be positive".to_string()));
        }

        if let Some(ref sql) = self.sql {
            if !sql.driver.trim().eq_ignore_ascii_case(DEFAULT_SQL_DRIVER) {
                return Err(ConfigError::Invalid(format!("unsupported sql driver: {}", sql.driver)));
            }
        }

        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        parse_bind_address(&self.http_addr)
            .ok_or_else(|| ConfigError::Invalid(format!("invalid bind address: {}", self.http_addr)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tool_sdk::config::MemoryConfigProvider;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::from_provider(&MemoryConfigProvider::new()).unwrap();

        assert_eq!(config.bind_address().unwrap(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.llm.base_url, "http://localhost:8000");
        assert_eq!(config.qdrant.collection, "advisor_passages");
        assert_eq!(config.rag_top_k, 5);
        assert!(config.tools.is_none());
        assert!(config.sql.is_none());
        assert_eq!(config.request_timeout(), Duration::from_secs(90));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(10));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.service_name, "advisor-gateway");
    }

    #[test]
    fn test_overrides() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("http_addr", "http://127.0.0.1:9090");
        provider.set("rag_top_k", "-2");
        provider.set("tools_base_url", "http://tools:7000");
        provider.set("sql_dsn", "mysql://advisor:secret@db/school");
        provider.set("log_format", "TEXT");

        let config = AdvisorConfig::from_provider(&provider).unwrap();

        assert_eq!(config.bind_address().unwrap(), "127.0.0.1:9090".parse().unwrap());
        // Coercion happens in the retrieval stage
        assert_eq!(config.rag_top_k, -2);
        assert_eq!(config.tools.unwrap().base_url, "http://tools:7000");
        assert_eq!(
            config.sql,
            Some(SqlConfig {
                driver: "mysql".to_string(),
                dsn: "mysql://advisor:secret@db/school".to_string()
            })
        );
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("http_addr", "not an address");
        assert!(matches!(AdvisorConfig::from_provider(&provider), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_timeouts() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("request_timeout_seconds", "0");
        assert!(AdvisorConfig::from_provider(&provider).is_err());

        let mut provider = MemoryConfigProvider::new();
        provider.set("llm_timeout_seconds", "0");
        assert!(matches!(AdvisorConfig::from_provider(&provider), Err(ConfigError::Provider(_))));
    }

    #[test]
    fn test_rejects_unsupported_driver_only_with_dsn() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("sql_driver", "postgres");
        assert!(AdvisorConfig::from_provider(&provider).is_ok());

        provider.set("sql_dsn", "postgres://localhost/school");
        let err = AdvisorConfig::from_provider(&provider).unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: unsupported sql driver: postgres");
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("log_format", "xml");
        assert!(AdvisorConfig::from_provider(&provider).is_err());
    }

    #[test]
    fn test_env_file_outcomes() {
        assert_eq!(
            EnvFile::from_outcome(Ok(PathBuf::from("/srv/advisor/.env"))),
            EnvFile::Loaded(PathBuf::from("/srv/advisor/.env"))
        );

        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no .env");
        assert_eq!(EnvFile::from_outcome(Err(dotenv::Error::Io(missing))), EnvFile::Missing);

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(EnvFile::from_outcome(Err(dotenv::Error::Io(denied))), EnvFile::Unreadable(_)));

        let malformed = dotenv::Error::LineParse("KEY VALUE".to_string(), 3);
        assert!(matches!(EnvFile::from_outcome(Err(malformed)), EnvFile::Unreadable(_)));
    }

    #[test]
    fn test_invalid_integer_is_an_error() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("rag_top_k", "five");
        assert!(matches!(AdvisorConfig::from_provider(&provider), Err(ConfigError::Provider(_))));
    }
}
