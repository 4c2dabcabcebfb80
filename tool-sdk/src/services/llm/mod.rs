//! Completion server client implementation
//!
//! This module provides a strongly-typed client for an OpenAI-compatible
//! completion server (vLLM, llama.cpp server, Ollama, ...), with support for
//! chat completions and embeddings.

mod models;
pub use models::*;

use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{LlmConfig, ServiceConfig};
use crate::error::{Result, ServiceError};
use crate::services::common::{build_http_client, create_error_context, send_json, UserAgent};
use crate::util::join_url;

const SERVICE_NAME: &str = "llm";
const CHAT_COMPLETIONS_ENDPOINT: &str = "v1/chat/completions";
const EMBEDDINGS_ENDPOINT: &str = "v1/embeddings";

/// Completion server client
#[derive(Debug, Clone)]
pub struct LlmClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new client from a validated configuration
    pub fn new(config: LlmConfig) -> Result<Self> {
        config.validate()?;

        let http_client = build_http_client(
            Some(UserAgent::for_client("llm-client")),
            Some(Duration::from_secs(config.timeout_seconds)),
        )?;

        Ok(Self { http_client, config })
    }

    /// Model used for chat completions
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Server root this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Send a chat completion request
    pub async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        self.post(CHAT_COMPLETIONS_ENDPOINT, request).await
    }

    /// Send a text embedding request
    pub async fn embeddings(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        self.post(EMBEDDINGS_ENDPOINT, request).await
    }

    /// Run a chat completion with the configured model and return the text of
    /// the first choice.
    ///
    /// A response without any choice is an error; a choice without content
    /// yields an empty string.
    pub async fn complete(&self, messages: Vec<ChatMessage>, tools: Vec<ToolSpec>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            tools,
            ..Default::default()
        };

        let response = self.chat_completion(&request).await?;
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ServiceError::parsing("chat completion response missing choices")
                .with_context(create_error_context(SERVICE_NAME, CHAT_COMPLETIONS_ENDPOINT, None))
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }

    /// Generate an embedding for a text with the configured embedding model
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: self.config.embedding_model.clone(),
            input: text.to_string(),
        };

        let response = self.embeddings(&request).await?;
        let err = match response.data.into_iter().next() {
            Some(embedding) if !embedding.embedding.is_empty() => return Ok(embedding.embedding),
            Some(_) => ServiceError::parsing("embedding response contained an empty vector"),
            None => ServiceError::parsing("embedding response missing data"),
        };
        Err(err.with_context(create_error_context(SERVICE_NAME, EMBEDDINGS_ENDPOINT, None)))
    }

    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = join_url(&self.config.base_url, endpoint);
        debug!("Sending request to completion server: POST {}", url);

        let mut builder = self.http_client.post(&url).json(body);
        if let Some(ref api_key) = self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        send_json(SERVICE_NAME, endpoint, builder).await
    }
}
