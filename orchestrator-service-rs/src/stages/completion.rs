use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use shared_types::{CompletionResult, ToolContext};
use tool_sdk::llm::{ChatMessage, ToolSpec};
use tracing::info;

use super::Stage;
use crate::backends::CompletionBackend;
use crate::error::PipelineError;
use crate::scope::RequestScope;

/// Fixed instruction at the start of every system message
pub const SYSTEM_INSTRUCTION: &str =
    "You are an education and support advisor. Always respond with valid JSON matching the required schema.";

/// Asks the model for the final answer
pub struct CompletionStage {
    backend: Arc<dyn CompletionBackend>,
    catalog: Vec<ToolSpec>,
}

impl CompletionStage {
    /// `catalog` is sent with every request so the model knows the tools
    pub fn new(backend: Arc<dyn CompletionBackend>, catalog: Vec<ToolSpec>) -> Self {
        Self { backend, catalog }
    }

    /// System and user messages for one request
    pub fn build_messages(input: &ToolContext) -> Vec<ChatMessage> {
        let mut system = SYSTEM_INSTRUCTION.to_string();
        if !input.passages.is_empty() {
            system.push_str("\nRetrieved passages:\n");
            system.push_str(&input.passages.join("\n"));
        }

        let payload = Value::Object(input.tool.payload.clone());
        let user = format!("{}\nTool data: {}", input.request.message, payload);

        vec![ChatMessage::system(system), ChatMessage::user(user)]
    }
}

#[async_trait]
impl Stage for CompletionStage {
    type Input = ToolContext;
    type Output = CompletionResult;

    fn name(&self) -> &'static str {
        "llm_completion"
    }

    async fn run(&self, input: ToolContext, scope: &RequestScope) -> Result<CompletionResult, PipelineError> {
        input.validate().map_err(PipelineError::validation)?;

        let content = self
            .backend
            .complete(Self::build_messages(&input), self.catalog.clone())
            .await
            .map_err(|e| PipelineError::backend("chat completion", &e))?;

        info!(parent: scope.span(), stage = self.name(), content_len = content.len(), "llm completion received");

        let result = CompletionResult::new(content);
        result.validate().map_err(PipelineError::output_contract)?;
        Ok(result)
    }
}
