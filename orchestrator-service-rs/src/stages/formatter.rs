use async_trait::async_trait;
use shared_types::{CompletionResult, StructuredAnalysis};
use tracing::info;

use super::Stage;
use crate::error::PipelineError;
use crate::scope::RequestScope;

/// Parses the model text and enforces the output schema
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFormatter;

#[async_trait]
impl Stage for ResponseFormatter {
    type Input = CompletionResult;
    type Output = StructuredAnalysis;

    fn name(&self) -> &'static str {
        "response_formatter"
    }

    async fn run(&self, input: CompletionResult, scope: &RequestScope) -> Result<StructuredAnalysis, PipelineError> {
        input.validate().map_err(PipelineError::output_contract)?;

        let analysis: StructuredAnalysis =
            serde_json::from_str(&input.content).map_err(|e| PipelineError::InvalidOutput(e.to_string()))?;
        analysis.validate().map_err(PipelineError::output_contract)?;

        info!(parent: scope.span(), stage = self.name(), "response formatted");
        Ok(analysis)
    }
}
