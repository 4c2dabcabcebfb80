//! Advisor pipeline engine
//!
//! Runs Normalize, Retrieve-Context, Dispatch-Tool, Complete and Format in a
//! fixed order. Each stage validates what it receives and what it returns, and
//! the first failing stage ends the run.

pub mod backends;
pub mod error;
pub mod pipeline;
pub mod scope;
pub mod stages;

pub use backends::{CompletionBackend, PassageSearch, ToolInvoker};
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use scope::RequestScope;
pub use stages::{
    CompletionStage, ContextRetriever, RequestNormalizer, ResponseFormatter, Stage, ToolDispatchStage,
};

#[cfg(test)]
mod tests;
