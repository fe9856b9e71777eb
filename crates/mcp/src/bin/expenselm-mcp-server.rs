// Standalone MCP server binary, launched by the desktop client over stdio

use anyhow::{Context, Result};
use expenselm_mcp::config::ServerConfig;
use expenselm_mcp::server::McpServer;
use expenselm_mcp::tools::expenselm_registry;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("ExpenseLM MCP Server starting...");

    let config = ServerConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        endpoint = %config.endpoint,
        timeout_ms = config.timeout.as_millis() as u64,
        "Loaded configuration"
    );

    let client = config
        .build_client()
        .context("Failed to create ExpenseLM client")?;

    let registry = expenselm_registry(client);
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry).with_call_timeout(config.timeout);
    server.start().await?;

    Ok(())
}
