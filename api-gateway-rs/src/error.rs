//! Error envelope returned by the gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::PipelineError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Anything the analyze route can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid JSON")]
    InvalidJson,

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(err) => match err {
                PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
                PipelineError::Backend { .. }
                | PipelineError::InvalidOutput(_)
                | PipelineError::OutputContract(_) => StatusCode::BAD_GATEWAY,
                PipelineError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
                PipelineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
