//! readthru MCP server entry point.
//!
//! Boots the MCP server on stdio transport over the configured cache and
//! document store, and closes both stores when the client disconnects.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use readthru_client::Services;
use readthru_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let services = Services::open(config).await?;

    let served = serve(services.clone()).await;
    services.close().await?;
    served
}

async fn serve(services: Services) -> Result<()> {
    tracing::info!("Starting readthru server on stdio transport");

    let handler = handler::ReadthruServer::new(services);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
