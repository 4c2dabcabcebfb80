//! Intermediate values passed between pipeline stages

use serde_json::{Map, Value};

use crate::{require_non_blank, NormalizedRequest, Result};

/// Tool name reported when no lookup was needed for a request
pub const NOOP_TOOL_NAME: &str = "noop";

/// Normalized request plus the passages retrieved for it
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalContext {
    pub request: NormalizedRequest,
    /// Passages in the order the search backend returned them
    pub passages: Vec<String>,
    /// Vector the passages were retrieved with
    pub embedding: Vec<f32>,
}

impl RetrievalContext {
    pub fn validate(&self) -> Result<()> {
        self.request.validate()
    }
}

/// Outcome of the tool-dispatch stage
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub tool_name: String,
    /// Always present; empty for the no-op result
    pub payload: Map<String, Value>,
}

impl ToolResult {
    pub fn new(tool_name: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            payload,
        }
    }

    /// Result recorded when the request mode needs no lookup
    pub fn noop() -> Self {
        Self::new(NOOP_TOOL_NAME, Map::new())
    }

    pub fn is_noop(&self) -> bool {
        self.tool_name == NOOP_TOOL_NAME
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank(&self.tool_name, "tool_name")
    }
}

/// Everything the completion stage needs to build its prompt
#[derive(Debug, Clone, PartialEq)]
pub struct ToolContext {
    pub request: NormalizedRequest,
    pub passages: Vec<String>,
    pub tool: ToolResult,
}

impl ToolContext {
    pub fn validate(&self) -> Result<()> {
        self.request.validate()?;
        self.tool.validate()
    }
}

/// Raw model answer, expected to be JSON encoding a `StructuredAnalysis`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    pub content: String,
}

impl CompletionResult {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank(&self.content, "content")
    }
}
