// api-gateway-rs/src/main.rs
// Advisor gateway: HTTP entry point for the five-stage advisor pipeline
//
// Startup order: configuration, logging, backend clients and tool wiring,
// then the listener. On SIGINT/SIGTERM the listener stops accepting, in-flight
// requests get a grace period, and anything still running is cancelled.

use std::sync::Arc;

use anyhow::Context;
use api_gateway::bootstrap::build_services;
use api_gateway::server::serve_with_grace;
use api_gateway::telemetry::init_tracing;
use api_gateway::ApiGateway;
use config_rs::AdvisorConfig;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Logging may not be up yet when configuration fails
        eprintln!("advisor-gateway: {:#}", e);
        error!(error = %format!("{:#}", e), "advisor gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let (config, env_file) = AdvisorConfig::load().context("failed to load configuration")?;
    init_tracing(config.log_format);
    env_file.report();

    let addr = config.bind_address()?;
    let services = build_services(&config)?;
    let executor = services.executor;

    let shutdown = CancellationToken::new();
    let gateway = ApiGateway::new(services.pipeline, shutdown.clone(), config.request_timeout())
        .with_service_name(config.service_name.clone());
    let app = Arc::new(gateway).create_router();

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, service = %config.service_name, "advisor gateway listening");

    let served = serve_with_grace(listener, app, shutdown_signal(), config.shutdown_grace(), shutdown).await;

    if let Some(executor) = executor {
        executor.close().await;
    }
    served.context("server failure")?;

    info!("advisor gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
