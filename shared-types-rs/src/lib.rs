//! shared-types-rs/lib.rs
//! Data shapes that flow through the advisor pipeline.
//!
//! Every shape carries a `validate` method enforcing its invariants; stages
//! call it on their input and again on their output before handing it on.

pub mod analysis;
pub mod context;
pub mod error;
pub mod request;

pub use analysis::{AnalysisDetail, DataSnapshot, Recommendation, StructuredAnalysis};
pub use context::{CompletionResult, RetrievalContext, ToolContext, ToolResult, NOOP_TOOL_NAME};
pub use error::SchemaError;
pub use request::{Mode, NormalizedRequest, UserRequest};

/// Result type for schema validation
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Fail with `"<field> is required"` when `value` is blank after trimming.
pub(crate) fn require_non_blank(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SchemaError::required(field));
    }
    Ok(())
}
