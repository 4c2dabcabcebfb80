use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map};
use shared_types::{Mode, RetrievalContext, ToolContext, ToolResult};
use tools_service::QUERY_STUDENT_SCORES;
use tracing::info;

use super::Stage;
use crate::backends::ToolInvoker;
use crate::error::PipelineError;
use crate::scope::RequestScope;

/// Runs the student score lookup for analysis requests
pub struct ToolDispatchStage {
    tools: Arc<dyn ToolInvoker>,
}

impl ToolDispatchStage {
    pub fn new(tools: Arc<dyn ToolInvoker>) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Stage for ToolDispatchStage {
    type Input = RetrievalContext;
    type Output = ToolContext;

    fn name(&self) -> &'static str {
        "mcp_tool_dispatch"
    }

    async fn run(&self, input: RetrievalContext, scope: &RequestScope) -> Result<ToolContext, PipelineError> {
        input.validate().map_err(PipelineError::validation)?;

        let tool = match input.request.mode {
            Mode::CustomerSupport => ToolResult::noop(),
            Mode::StudentAnalysis => {
                let student_id = match input.request.student_id {
                    Some(id) if id != 0 => id,
                    _ => {
                        return Err(PipelineError::Validation(
                            "student_id is required for student_analysis".to_string(),
                        ))
                    }
                };

                let mut args = Map::new();
                args.insert("student_id".to_string(), json!(student_id));
                args.insert("term".to_string(), json!(input.request.term));

                let payload = self.tools.dispatch(QUERY_STUDENT_SCORES, &args).await?;
                info!(parent: scope.span(), stage = self.name(), tool = QUERY_STUDENT_SCORES, "tool dispatched");
                ToolResult::new(QUERY_STUDENT_SCORES, payload)
            }
        };

        let context = ToolContext {
            request: input.request,
            passages: input.passages,
            tool,
        };
        context.validate().map_err(PipelineError::validation)?;
        Ok(context)
    }
}
