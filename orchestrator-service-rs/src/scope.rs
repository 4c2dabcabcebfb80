//! Per-request logging and cancellation handle

use tokio_util::sync::CancellationToken;
use tracing::Span;

const COMPONENT: &str = "orchestrator";

/// Identifiers, span and cancellation token of one request.
///
/// Passed explicitly to every stage so logs carry the request and trace ids
/// without any implicit context lookup.
#[derive(Debug, Clone)]
pub struct RequestScope {
    request_id: String,
    trace_id: String,
    component: &'static str,
    span: Span,
    cancel: CancellationToken,
}

impl RequestScope {
    pub fn new(request_id: impl Into<String>, trace_id: impl Into<String>, cancel: CancellationToken) -> Self {
        let request_id = request_id.into().trim().to_string();
        let trace_id = trace_id.into().trim().to_string();
        let span = tracing::info_span!(
            "request",
            request_id = %request_id,
            trace_id = %trace_id,
            component = COMPONENT,
        );

        Self {
            request_id,
            trace_id,
            component: COMPONENT,
            span,
            cancel,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Parent span for everything logged on behalf of this request
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Child span for one stage run
    pub fn stage_span(&self, stage: &'static str) -> Span {
        tracing::info_span!(parent: &self.span, "stage", stage)
    }
}
