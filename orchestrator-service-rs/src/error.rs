//! Pipeline failure taxonomy

use shared_types::SchemaError;
use thiserror::Error;
use tool_sdk::ServiceError;
use tools_service::ToolError;

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" (status {})", code)).unwrap_or_default()
}

/// The single error a pipeline run can end with
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Caller input was rejected
    #[error("{0}")]
    Validation(String),

    /// A collaborator failed to answer or answered with an error
    #[error("{operation} failed{}: {message}", status_suffix(.status))]
    Backend {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    /// Model text is not the expected JSON shape
    #[error("invalid model output: {0}")]
    InvalidOutput(String),

    /// Model text parsed but breaks a field invariant
    #[error("{0}")]
    OutputContract(String),

    /// Registry or wiring problem
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request deadline passed or the caller went away
    #[error("request cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Stable label used in logs
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Backend { .. } => "backend",
            PipelineError::InvalidOutput(_) => "invalid_output",
            PipelineError::OutputContract(_) => "output_contract",
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Cancelled => "cancelled",
        }
    }

    /// Wrap a transport failure with the operation that hit it
    pub fn backend(operation: &str, err: &ServiceError) -> Self {
        PipelineError::Backend {
            operation: operation.to_string(),
            status: err.status_code(),
            message: err.to_string(),
        }
    }

    pub(crate) fn validation(err: SchemaError) -> Self {
        PipelineError::Validation(err.to_string())
    }

    pub(crate) fn output_contract(err: SchemaError) -> Self {
        PipelineError::OutputContract(err.to_string())
    }
}

impl From<ToolError> for PipelineError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidArguments(message) => PipelineError::Validation(message),
            ToolError::Remote(ref inner) => PipelineError::backend("tool dispatch", inner),
            ToolError::Database(ref inner) => PipelineError::Backend {
                operation: "tool query".to_string(),
                status: None,
                message: inner.to_string(),
            },
            other => PipelineError::Configuration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tool_sdk::ErrorContext;

    #[test]
    fn test_backend_error_names_operation_and_status() {
        let err = ServiceError::service("overloaded").with_context(ErrorContext::for_service("llm").status_code(503));
        let pipeline_err = PipelineError::backend("embedding", &err);

        assert_eq!(pipeline_err.category(), "backend");
        assert_eq!(
            pipeline_err.to_string(),
            "embedding failed (status 503): Service error: overloaded"
        );
    }

    #[test]
    fn test_backend_error_without_status() {
        let err = PipelineError::backend("vector search", &ServiceError::network("connection refused"));
        assert_eq!(err.to_string(), "vector search failed: Network error: connection refused");
    }

    #[test]
    fn test_tool_error_mapping() {
        let err: PipelineError = ToolError::InvalidArguments("student_id is required".to_string()).into();
        assert_eq!(err, PipelineError::Validation("student_id is required".to_string()));

        let err: PipelineError = ToolError::UnknownTool("x".to_string()).into();
        assert_eq!(err.category(), "configuration");

        let err: PipelineError = ToolError::NotConfigured("no backend".to_string()).into();
        assert_eq!(err.category(), "configuration");

        let remote = ServiceError::service("boom").with_context(ErrorContext::for_service("tools").status_code(500));
        let err: PipelineError = ToolError::Remote(remote).into();
        assert!(matches!(err, PipelineError::Backend { ref operation, status: Some(500), .. } if operation == "tool dispatch"));
    }

    #[test]
    fn test_categories_are_distinct() {
        let errors = [
            PipelineError::Validation(String::new()),
            PipelineError::InvalidOutput(String::new()),
            PipelineError::OutputContract(String::new()),
            PipelineError::Configuration(String::new()),
            PipelineError::Cancelled,
        ];
        let mut labels: Vec<&str> = errors.iter().map(PipelineError::category).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), errors.len());
    }
}
