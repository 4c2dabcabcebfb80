//! Inbound request shapes: the raw `UserRequest` and its canonical form

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{require_non_blank, Result, SchemaError};

/// The two request modes the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Free-form support conversation, answered from retrieved passages only
    CustomerSupport,
    /// Performance analysis backed by a score lookup for one student
    StudentAnalysis,
}

impl Mode {
    /// Parse a mode tag, ignoring case and surrounding whitespace.
    ///
    /// The error carries the value exactly as it was received.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "customer_support" => Ok(Mode::CustomerSupport),
            "student_analysis" => Ok(Mode::StudentAnalysis),
            _ => Err(SchemaError::UnsupportedMode(raw.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::CustomerSupport => "customer_support",
            Mode::StudentAnalysis => "student_analysis",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body as received at the transport boundary.
///
/// Missing fields decode to their empty value so that `validate` (and not the
/// JSON decoder) decides which field is at fault.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRequest {
    pub request_id: String,
    pub trace_id: String,
    pub mode: String,
    pub message: String,
    pub student_id: Option<i64>,
    pub term: Option<String>,
}

impl UserRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_blank(&self.request_id, "request_id")?;
        require_non_blank(&self.trace_id, "trace_id")?;
        require_non_blank(&self.mode, "mode")?;
        require_non_blank(&self.message, "message")?;
        Ok(())
    }
}

/// Canonical request owned by the pipeline for the duration of one run
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub request_id: String,
    pub trace_id: String,
    pub mode: Mode,
    pub message: String,
    /// `None` when the caller omitted it; zero is kept as sent
    pub student_id: Option<i64>,
    /// Trimmed term label, empty when the caller omitted it
    pub term: String,
}

impl NormalizedRequest {
    /// Canonicalize a raw request: trim every string and parse the mode.
    ///
    /// The raw request is validated first and the result is validated again
    /// before it is returned.
    pub fn from_user_request(input: &UserRequest) -> Result<Self> {
        input.validate()?;
        let mode = Mode::parse(&input.mode)?;

        let normalized = Self {
            request_id: input.request_id.trim().to_string(),
            trace_id: input.trace_id.trim().to_string(),
            mode,
            message: input.message.trim().to_string(),
            student_id: input.student_id,
            term: input
                .term
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        };
        normalized.validate()?;
        Ok(normalized)
    }

    pub fn validate(&self) -> Result<()> {
        require_non_blank(&self.request_id, "request_id")?;
        require_non_blank(&self.trace_id, "trace_id")?;
        require_non_blank(&self.message, "message")?;
        Ok(())
    }
}
