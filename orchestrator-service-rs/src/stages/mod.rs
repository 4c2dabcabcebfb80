//! The five pipeline stages

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::scope::RequestScope;

mod completion;
mod formatter;
mod normalize;
mod retrieval;
mod tool_dispatch;

pub use completion::{CompletionStage, SYSTEM_INSTRUCTION};
pub use formatter::ResponseFormatter;
pub use normalize::RequestNormalizer;
pub use retrieval::{ContextRetriever, DEFAULT_TOP_K};
pub use tool_dispatch::ToolDispatchStage;

/// One step of the pipeline: a typed, validated transformation
#[async_trait]
pub trait Stage: Send + Sync {
    type Input: Send;
    type Output: Send;

    fn name(&self) -> &'static str;

    async fn run(&self, input: Self::Input, scope: &RequestScope) -> Result<Self::Output, PipelineError>;
}
