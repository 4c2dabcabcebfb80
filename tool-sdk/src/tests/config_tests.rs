//! Tests for configuration management functionality
//!
//! These tests verify the providers and the per-backend configuration loaders.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env;

    use crate::config::{
        ConfigProvider, ConfigProviderExt, EnvConfigProvider, LlmConfig, MemoryConfigProvider,
        QdrantConfig, ServiceConfig, ToolBackendConfig,
    };
    use crate::error::ServiceError;

    #[test]
    fn test_memory_config_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("api_key", "test_key");
        provider.set("timeout", "30");
        provider.set("blank", "   ");

        assert_eq!(provider.get_string("api_key").unwrap(), "test_key");
        assert_eq!(provider.get_int("timeout").unwrap(), 30);

        assert_eq!(provider.get_string_or("missing", "default"), "default");
        assert_eq!(provider.get_int_or("missing", 60).unwrap(), 60);

        // Blank counts as unset
        assert_eq!(provider.lookup("blank"), None);
        assert!(provider.get_string("missing").is_err());
        assert!(provider.get_int("api_key").is_err());
        assert!(provider.get_int_or("api_key", 5).is_err());
    }

    #[test]
    fn test_env_config_provider() {
        env::set_var("TOOLSDKTEST_LLM_MODEL", "env-model");
        env::set_var("TOOLSDKTEST_LLM_TIMEOUT_SECONDS", "12");
        env::set_var("TOOLSDKTEST_EMPTY", "");

        let provider = EnvConfigProvider::new().with_prefix("TOOLSDKTEST");

        assert_eq!(provider.format_key("llm.model"), "TOOLSDKTEST_LLM_MODEL");
        assert_eq!(provider.get_string("llm_model").unwrap(), "env-model");
        assert_eq!(provider.get_int("llm_timeout_seconds").unwrap(), 12);
        assert_eq!(provider.lookup("empty"), None);

        let err = provider.get_string("missing_key").unwrap_err();
        assert!(err.to_string().contains("TOOLSDKTEST_MISSING_KEY"));

        env::remove_var("TOOLSDKTEST_LLM_MODEL");
        env::remove_var("TOOLSDKTEST_LLM_TIMEOUT_SECONDS");
        env::remove_var("TOOLSDKTEST_EMPTY");
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::from_provider(&MemoryConfigProvider::new()).unwrap();

        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.model, "qwen2.5-7b-instruct");
        assert_eq!(config.embedding_model, "qwen2.5-7b-instruct");
        assert_eq!(config.api_key, None);
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.service_name(), "llm");
    }

    #[test]
    fn test_embedding_model_follows_chat_model() {
        let mut values = HashMap::new();
        values.insert("llm_model".to_string(), "llama3".to_string());
        let config = LlmConfig::from_provider(&MemoryConfigProvider::with_values(values)).unwrap();

        assert_eq!(config.embedding_model, "llama3");
    }

    #[test]
    fn test_llm_config_rejects_bad_values() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("llm_timeout_seconds", "0");
        assert!(matches!(LlmConfig::from_provider(&provider), Err(ServiceError::Configuration(_))));

        let mut provider = MemoryConfigProvider::new();
        provider.set("llm_base_url", "localhost:8000");
        assert!(matches!(LlmConfig::from_provider(&provider), Err(ServiceError::Configuration(_))));
    }

    #[test]
    fn test_qdrant_config() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("qdrant_collection", "lessons");
        provider.set("qdrant_api_key", "secret");

        let config = QdrantConfig::from_provider(&provider).unwrap();
        assert_eq!(config.url, "http://localhost:6333");
        assert_eq!(config.collection, "lessons");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_tool_backend_config_is_optional() {
        assert!(ToolBackendConfig::from_provider(&MemoryConfigProvider::new()).unwrap().is_none());

        let mut provider = MemoryConfigProvider::new();
        provider.set("tools_base_url", "http://tools:9000");
        let config = ToolBackendConfig::from_provider(&provider).unwrap().unwrap();
        assert_eq!(config.base_url, "http://tools:9000");
        assert_eq!(config.timeout_seconds, 30);

        provider.set("tools_timeout_seconds", "-1");
        assert!(ToolBackendConfig::from_provider(&provider).is_err());
    }
}
