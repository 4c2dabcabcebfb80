use thiserror::Error;
use tool_sdk::ServiceError;

/// Errors raised while registering or running tools
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid tool {name}: {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("missing named argument: {0}")]
    MissingNamedArgument(String),

    #[error("invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("unsupported local tool: {0}")]
    UnsupportedLocalTool(String),

    #[error("sql template for {0} must be read-only")]
    ReadOnlyViolation(String),

    #[error("unsupported sql driver: {0}")]
    UnsupportedDriver(String),

    #[error("tool backend not configured: {0}")]
    NotConfigured(String),

    #[error("tool dispatch failed: {0}")]
    Remote(#[from] ServiceError),

    #[error("query failed: {0}")]
    Database(#[from] sqlx::Error),
}

impl ToolError {
    pub(crate) fn invalid_definition(name: &str, reason: impl Into<String>) -> Self {
        ToolError::InvalidDefinition {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
