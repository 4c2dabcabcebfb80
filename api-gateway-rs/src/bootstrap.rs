//! Startup wiring: configuration in, ready pipeline out

use std::sync::Arc;

use anyhow::Context;
use config_rs::AdvisorConfig;
use orchestrator::Pipeline;
use tool_sdk::llm::LlmClient;
use tool_sdk::qdrant::QdrantClient;
use tool_sdk::tool_backend::ToolBackendClient;
use tools_service::{DispatchRoute, MySqlExecutor, ToolDispatcher, ToolRegistry};
use tracing::{info, warn};

/// Everything built at startup
pub struct Services {
    pub pipeline: Pipeline,
    /// Kept so the pool can be closed on shutdown
    pub executor: Option<MySqlExecutor>,
    pub route: DispatchRoute,
}

/// Build the backend clients, the tool registry and the pipeline.
///
/// Must run inside a tokio runtime when a SQL DSN is configured.
pub fn build_services(config: &AdvisorConfig) -> anyhow::Result<Services> {
    let llm = Arc::new(LlmClient::new(config.llm.clone()).context("failed to build completion client")?);
    let qdrant = Arc::new(QdrantClient::new(config.qdrant.clone()).context("failed to build vector search client")?);

    let registry = Arc::new(ToolRegistry::with_default_tools().context("invalid tool registry")?);
    let catalog = registry.specs();
    let mut dispatcher = ToolDispatcher::new(registry);

    if let Some(ref tools) = config.tools {
        let client = ToolBackendClient::new(tools.clone()).context("failed to build tool backend client")?;
        dispatcher = dispatcher.with_remote(client);
    }

    let mut executor = None;
    if let Some(ref sql) = config.sql {
        let mysql = MySqlExecutor::connect(&sql.driver, &sql.dsn).context("failed to open sql pool")?;
        dispatcher = dispatcher.with_executor(Arc::new(mysql.clone()));
        executor = Some(mysql);
    }

    let route = dispatcher.route();
    match route {
        DispatchRoute::Remote => info!(base_url = ?config.tools.as_ref().map(|t| &t.base_url), "tools dispatched to remote backend"),
        DispatchRoute::Local => info!("tools executed against the local sql store"),
        DispatchRoute::Unconfigured => {
            warn!("no tool backend or sql dsn configured; student_analysis requests will fail")
        }
    }

    let pipeline = Pipeline::from_backends(llm.clone(), qdrant, Arc::new(dispatcher), catalog, config.rag_top_k);
    info!(
        model = llm.model(),
        collection = %config.qdrant.collection,
        top_k = config.rag_top_k,
        "pipeline ready"
    );

    Ok(Services {
        pipeline,
        executor,
        route,
    })
}
