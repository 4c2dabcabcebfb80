//! Seams between the stages and the outside world
//!
//! Stages only see these traits; the HTTP and SQL clients implement them.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tool_sdk::llm::{ChatMessage, LlmClient, ToolSpec};
use tool_sdk::qdrant::QdrantClient;
use tools_service::{ToolDispatcher, ToolError};

/// Embedding and chat completion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn embed(&self, text: &str) -> tool_sdk::Result<Vec<f32>>;

    /// Text of the first answer choice
    async fn complete(&self, messages: Vec<ChatMessage>, tools: Vec<ToolSpec>) -> tool_sdk::Result<String>;
}

/// Nearest-passage search
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PassageSearch: Send + Sync {
    /// Up to `limit` passages, best match first
    async fn search(&self, vector: &[f32], limit: usize) -> tool_sdk::Result<Vec<String>>;
}

/// Tool execution
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn dispatch(&self, name: &str, args: &Map<String, Value>) -> Result<Map<String, Value>, ToolError>;
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn embed(&self, text: &str) -> tool_sdk::Result<Vec<f32>> {
        LlmClient::embed(self, text).await
    }

    async fn complete(&self, messages: Vec<ChatMessage>, tools: Vec<ToolSpec>) -> tool_sdk::Result<String> {
        LlmClient::complete(self, messages, tools).await
    }
}

#[async_trait]
impl PassageSearch for QdrantClient {
    async fn search(&self, vector: &[f32], limit: usize) -> tool_sdk::Result<Vec<String>> {
        QdrantClient::search(self, vector, limit).await
    }
}

#[async_trait]
impl ToolInvoker for ToolDispatcher {
    async fn dispatch(&self, name: &str, args: &Map<String, Value>) -> Result<Map<String, Value>, ToolError> {
        ToolDispatcher::dispatch(self, name, args).await
    }
}
