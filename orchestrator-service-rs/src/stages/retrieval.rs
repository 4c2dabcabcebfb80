use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{NormalizedRequest, RetrievalContext};
use tracing::info;

use super::Stage;
use crate::backends::{CompletionBackend, PassageSearch};
use crate::error::PipelineError;
use crate::scope::RequestScope;

/// Passages fetched when the configured count is not positive
pub const DEFAULT_TOP_K: usize = 5;

/// Embeds the message and fetches the nearest passages
pub struct ContextRetriever {
    embedder: Arc<dyn CompletionBackend>,
    search: Arc<dyn PassageSearch>,
    top_k: usize,
}

impl ContextRetriever {
    pub fn new(embedder: Arc<dyn CompletionBackend>, search: Arc<dyn PassageSearch>, top_k: i64) -> Self {
        let top_k = if top_k > 0 { top_k as usize } else { DEFAULT_TOP_K };
        Self {
            embedder,
            search,
            top_k,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[async_trait]
impl Stage for ContextRetriever {
    type Input = NormalizedRequest;
    type Output = RetrievalContext;

    fn name(&self) -> &'static str {
        "rag_retrieval"
    }

    async fn run(&self, input: NormalizedRequest, scope: &RequestScope) -> Result<RetrievalContext, PipelineError> {
        input.validate().map_err(PipelineError::validation)?;

        let embedding = self
            .embedder
            .embed(&input.message)
            .await
            .map_err(|e| PipelineError::backend("embedding", &e))?;

        let passages = self
            .search
            .search(&embedding, self.top_k)
            .await
            .map_err(|e| PipelineError::backend("vector search", &e))?;

        info!(parent: scope.span(), stage = self.name(), passage_count = passages.len(), "rag retrieved");

        let context = RetrievalContext {
            request: input,
            passages,
            embedding,
        };
        context.validate().map_err(PipelineError::validation)?;
        Ok(context)
    }
}
