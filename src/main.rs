//! Deskpilot - desktop control MCP server
//!
//! Serves the computer-use action vocabulary for the local desktop over stdio.

use deskpilot::config::ControllerConfig;
use deskpilot::server::DeskpilotServer;
use rmcp::ServiceExt;
use rmcp::transport::io::stdio;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr to keep stdout clean for MCP protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ControllerConfig::from_env();
    tracing::info!(
        "Starting Deskpilot MCP Server (initial URL {}, search engine {})",
        config.initial_url,
        config.search_engine_url
    );

    let server = DeskpilotServer::new(config).await?;

    let transport = stdio();

    tracing::info!("Deskpilot MCP Server ready, listening on stdio");

    let service = server.serve(transport).await?;

    service.waiting().await?;

    tracing::info!("Deskpilot MCP Server shutting down");
    Ok(())
}
