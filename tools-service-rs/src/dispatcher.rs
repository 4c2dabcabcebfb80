//! Tool Dispatcher
//!
//! Routes a tool call to the remote tool backend when one is configured and
//! otherwise to local execution against the relational store.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tool_sdk::tool_backend::ToolBackendClient;
use tracing::{debug, info};

use crate::error::ToolError;
use crate::executor::QueryExecutor;
use crate::registry::{is_read_only_sql, Tool, ToolRegistry, QUERY_STUDENT_SCORES};
use crate::sql_binder::bind_named;

/// Where dispatched tools run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRoute {
    Remote,
    Local,
    Unconfigured,
}

/// Runs registered tools
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    remote: Option<ToolBackendClient>,
    executor: Option<Arc<dyn QueryExecutor>>,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            remote: None,
            executor: None,
        }
    }

    /// Send every call to a remote tool backend
    pub fn with_remote(mut self, client: ToolBackendClient) -> Self {
        self.remote = Some(client);
        self
    }

    /// Run calls locally when no remote backend is set
    pub fn with_executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn route(&self) -> DispatchRoute {
        match (&self.remote, &self.executor) {
            (Some(_), _) => DispatchRoute::Remote,
            (None, Some(_)) => DispatchRoute::Local,
            (None, None) => DispatchRoute::Unconfigured,
        }
    }

    /// Run the tool `name` with `args` and return its result object
    pub async fn dispatch(&self, name: &str, args: &Map<String, Value>) -> Result<Map<String, Value>, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        if let Some(ref remote) = self.remote {
            debug!(tool = name, base_url = remote.base_url(), "dispatching tool remotely");
            return Ok(remote.invoke(name, args, &tool.sql_template).await?);
        }

        match self.executor {
            Some(ref executor) => self.dispatch_local(tool, args, executor.as_ref()).await,
            None => Err(ToolError::NotConfigured(
                "neither a tool backend nor a sql executor is available".to_string(),
            )),
        }
    }

    async fn dispatch_local(
        &self,
        tool: &Tool,
        args: &Map<String, Value>,
        executor: &dyn QueryExecutor,
    ) -> Result<Map<String, Value>, ToolError> {
        if tool.name != QUERY_STUDENT_SCORES {
            return Err(ToolError::UnsupportedLocalTool(tool.name.clone()));
        }
        if !is_read_only_sql(&tool.sql_template) {
            return Err(ToolError::ReadOnlyViolation(tool.name.clone()));
        }

        let student_id = args
            .get("student_id")
            .and_then(Value::as_i64)
            .filter(|id| *id != 0)
            .ok_or_else(|| ToolError::InvalidArguments("student_id is required".to_string()))?;
        let term = args.get("term").and_then(Value::as_str).unwrap_or_default();

        let mut bind_args = Map::new();
        bind_args.insert("student_id".to_string(), json!(student_id));
        bind_args.insert("term".to_string(), json!(term));
        let query = bind_named(&tool.sql_template, &bind_args)?;

        let scores = executor.fetch_subject_scores(&query).await?;
        info!(tool = %tool.name, student_id, rows = scores.len(), "local tool query finished");

        let mut payload = Map::new();
        payload.insert("student_id".to_string(), json!(student_id));
        payload.insert("scores".to_string(), serde_json::to_value(scores).unwrap_or_default());
        Ok(payload)
    }
}
