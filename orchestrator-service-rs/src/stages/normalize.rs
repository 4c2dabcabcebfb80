use async_trait::async_trait;
use shared_types::{NormalizedRequest, UserRequest};
use tracing::info;

use super::Stage;
use crate::error::PipelineError;
use crate::scope::RequestScope;

/// Validates the raw request and builds its canonical form
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestNormalizer;

#[async_trait]
impl Stage for RequestNormalizer {
    type Input = UserRequest;
    type Output = NormalizedRequest;

    fn name(&self) -> &'static str {
        "request_normalizer"
    }

    async fn run(&self, input: UserRequest, scope: &RequestScope) -> Result<NormalizedRequest, PipelineError> {
        let normalized = NormalizedRequest::from_user_request(&input).map_err(PipelineError::validation)?;

        info!(parent: scope.span(), stage = self.name(), mode = %normalized.mode, "normalized request");
        Ok(normalized)
    }
}
