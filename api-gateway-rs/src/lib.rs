//! Advisor gateway
//!
//! HTTP surface of the advisor pipeline: one analyze route, a health probe,
//! request tracing and the error envelope.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use orchestrator::{Pipeline, RequestScope};
use serde::Serialize;
use shared_types::UserRequest;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub mod bootstrap;
pub mod error;
pub mod server;
pub mod telemetry;

pub use error::{ApiError, ErrorResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: i64,
    pub status: String,
}

/// Shared gateway state
pub struct ApiGateway {
    pipeline: Pipeline,
    shutdown: CancellationToken,
    request_timeout: Duration,
    service_name: String,
    started_at: Instant,
}

impl ApiGateway {
    pub fn new(pipeline: Pipeline, shutdown: CancellationToken, request_timeout: Duration) -> Self {
        Self {
            pipeline,
            shutdown,
            request_timeout,
            service_name: config_rs::SERVICE_NAME.to_string(),
            started_at: Instant::now(),
        }
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// Create the Axum router with all routes and middleware
    pub fn create_router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/", post(Self::analyze_handler))
            .route("/v1/analyze", post(Self::analyze_handler))
            .route("/health", get(Self::health_handler))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(self)
    }

    async fn health_handler(State(state): State<Arc<Self>>) -> impl IntoResponse {
        Json(HealthResponse {
            healthy: true,
            service_name: state.service_name.clone(),
            uptime_seconds: state.started_at.elapsed().as_secs() as i64,
            status: "SERVING".to_string(),
        })
    }

    async fn analyze_handler(State(state): State<Arc<Self>>, body: Bytes) -> Response {
        let request: UserRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "rejected undecodable request body");
                return ApiError::InvalidJson.into_response();
            }
        };

        match state.analyze(request).await {
            Ok(analysis) => Json(analysis).into_response(),
            Err(err) => err.into_response(),
        }
    }

    /// Run one request under its own cancellation token.
    ///
    /// The token is a child of the shutdown token, is cancelled when the
    /// deadline passes, and is cancelled when this future is dropped.
    async fn analyze(&self, request: UserRequest) -> Result<shared_types::StructuredAnalysis, ApiError> {
        let cancel = self.shutdown.child_token();
        let _guard = cancel.clone().drop_guard();
        let scope = RequestScope::new(request.request_id.clone(), request.trace_id.clone(), cancel.clone());

        info!(parent: scope.span(), mode = %request.mode, "analyze request received");

        let run = self.pipeline.execute(request, &scope);
        tokio::pin!(run);

        let result = tokio::select! {
            result = &mut run => result,
            _ = tokio::time::sleep(self.request_timeout) => {
                warn!(parent: scope.span(), timeout_ms = self.request_timeout.as_millis() as u64, "request deadline passed");
                cancel.cancel();
                run.await
            }
        };

        Ok(result?)
    }
}

#[cfg(test)]
mod tests;
