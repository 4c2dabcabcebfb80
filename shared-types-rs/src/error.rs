//! Validation error shared by every schema type

use thiserror::Error;

/// An invariant violation on one of the pipeline shapes.
///
/// The message always names the offending field so it can be reported back
/// to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{0} is required")]
    Required(String),

    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("{0}")]
    Invalid(String),
}

impl SchemaError {
    pub fn required(field: impl Into<String>) -> Self {
        SchemaError::Required(field.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        SchemaError::Invalid(message.into())
    }
}
