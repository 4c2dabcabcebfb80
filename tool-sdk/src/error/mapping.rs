//! Error mapping for backend APIs
//!
//! This module provides mapping functions to convert backend error responses
//! to our normalized ServiceError type.

use reqwest::StatusCode;
use serde_json::Value;

use super::{ErrorContext, ServiceError};
use crate::util::truncate_string;

/// Longest error body echoed back in a message
const MAX_BODY_IN_MESSAGE: usize = 200;

/// Pick the ServiceError variant for a non-success status
fn error_for_status(status: StatusCode, message: impl Into<String>) -> ServiceError {
    let message = message.into();
    match status {
        StatusCode::UNAUTHORIZED => ServiceError::authentication(message),
        StatusCode::FORBIDDEN => ServiceError::authorization(message),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::rate_limit(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ServiceError::validation(message)
        }
        StatusCode::NOT_FOUND => ServiceError::not_found(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ServiceError::timeout(message),
        _ => ServiceError::service(message),
    }
}

/// Map an OpenAI-compatible completion server error to a ServiceError
///
/// These servers answer with `{"error": {"message", "type", "code"}}`.
pub fn map_llm_error(status: StatusCode, json: &Value, context: &mut ErrorContext) -> ServiceError {
    let Some(error) = json.get("error") else {
        return map_generic_json_error(status, json);
    };

    if let Some(error_type) = error.get("type").and_then(|t| t.as_str()) {
        context.add("error_type", error_type);
    }

    // Some servers send a numeric code, others a string
    match error.get("code") {
        Some(Value::String(code)) => context.error_code = Some(code.clone()),
        Some(Value::Number(code)) => context.error_code = Some(code.to_string()),
        _ => {}
    }

    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .unwrap_or("Unknown completion server error");

    error_for_status(status, message)
}

/// Map a Qdrant REST error to a ServiceError
///
/// Qdrant wraps failures as `{"status": {"error": "..."}, "time": ...}`.
pub fn map_qdrant_error(status: StatusCode, json: &Value, _context: &mut ErrorContext) -> ServiceError {
    match json
        .get("status")
        .and_then(|s| s.get("error"))
        .and_then(|e| e.as_str())
    {
        Some(message) => error_for_status(status, message),
        None => map_generic_json_error(status, json),
    }
}

fn map_generic_json_error(status: StatusCode, json: &Value) -> ServiceError {
    let message = json
        .get("message")
        .or_else(|| json.get("error"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}: {}", status, truncate_string(&json.to_string(), MAX_BODY_IN_MESSAGE)));

    error_for_status(status, message)
}

/// Map a generic HTTP error to a ServiceError
///
/// The service recorded in `context` selects a backend-specific mapper when the
/// body is JSON; anything else falls back to a status-based mapping.
pub fn map_http_error(status: StatusCode, body: &str, context: &mut ErrorContext) -> ServiceError {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        return match context.service.as_str() {
            "llm" => map_llm_error(status, &json, context),
            "qdrant" => map_qdrant_error(status, &json, context),
            _ => map_generic_json_error(status, &json),
        };
    }

    let message = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, truncate_string(body.trim(), MAX_BODY_IN_MESSAGE))
    };

    error_for_status(status, message)
}
