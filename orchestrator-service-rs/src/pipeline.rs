//! Pipeline Engine
//!
//! Five concrete stages called one after another with explicit intermediate
//! values. Every stage run races the request's cancellation token; the first
//! error ends the run and is returned unchanged.

use std::sync::Arc;
use std::time::Instant;

use shared_types::{StructuredAnalysis, UserRequest};
use tool_sdk::llm::ToolSpec;
use tracing::{error, info, Instrument};

use crate::backends::{CompletionBackend, PassageSearch, ToolInvoker};
use crate::error::PipelineError;
use crate::scope::RequestScope;
use crate::stages::{
    CompletionStage, ContextRetriever, RequestNormalizer, ResponseFormatter, Stage, ToolDispatchStage,
};

/// Stateless pipeline shared by every request
pub struct Pipeline {
    normalizer: RequestNormalizer,
    retriever: ContextRetriever,
    tool_dispatch: ToolDispatchStage,
    completion: CompletionStage,
    formatter: ResponseFormatter,
}

impl Pipeline {
    pub fn new(
        normalizer: RequestNormalizer,
        retriever: ContextRetriever,
        tool_dispatch: ToolDispatchStage,
        completion: CompletionStage,
        formatter: ResponseFormatter,
    ) -> Self {
        Self {
            normalizer,
            retriever,
            tool_dispatch,
            completion,
            formatter,
        }
    }

    /// Wire the five stages to their backends
    pub fn from_backends(
        llm: Arc<dyn CompletionBackend>,
        search: Arc<dyn PassageSearch>,
        tools: Arc<dyn ToolInvoker>,
        catalog: Vec<ToolSpec>,
        top_k: i64,
    ) -> Self {
        Self::new(
            RequestNormalizer,
            ContextRetriever::new(llm.clone(), search, top_k),
            ToolDispatchStage::new(tools),
            CompletionStage::new(llm, catalog),
            ResponseFormatter,
        )
    }

    /// Run one request through every stage
    pub async fn execute(&self, request: UserRequest, scope: &RequestScope) -> Result<StructuredAnalysis, PipelineError> {
        let started = Instant::now();

        let result = self.run_stages(request, scope).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(ref analysis) => {
                info!(parent: scope.span(), elapsed_ms, recommendations = analysis.recommendations.len(), "pipeline completed");
            }
            Err(ref err) => {
                error!(parent: scope.span(), elapsed_ms, category = err.category(), error = %err, "pipeline failed");
            }
        }
        result
    }

    async fn run_stages(&self, request: UserRequest, scope: &RequestScope) -> Result<StructuredAnalysis, PipelineError> {
        let normalized = run_stage(&self.normalizer, request, scope).await?;
        let retrieved = run_stage(&self.retriever, normalized, scope).await?;
        let with_tool = run_stage(&self.tool_dispatch, retrieved, scope).await?;
        let completion = run_stage(&self.completion, with_tool, scope).await?;
        run_stage(&self.formatter, completion, scope).await
    }
}

async fn run_stage<S: Stage>(stage: &S, input: S::Input, scope: &RequestScope) -> Result<S::Output, PipelineError> {
    let span = scope.stage_span(stage.name());

    let result = tokio::select! {
        biased;
        _ = scope.cancellation().cancelled() => Err(PipelineError::Cancelled),
        result = stage.run(input, scope).instrument(span.clone()) => result,
    };

    if let Err(ref err) = result {
        error!(parent: &span, stage = stage.name(), category = err.category(), error = %err, "stage failed");
    }
    result
}
