//! interscribe MCP server entry point.
//!
//! Boots the rotation cache for one serving host and exposes it on stdio.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use interscribe_core::{InterscribeConfig, Interscriber};
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

    let config = InterscribeConfig::load()?;
    let interscriber = Arc::new(Interscriber::startup(config));

    tracing::info!("Starting interscribe server on stdio transport");

    let handler = handler::InterscribeServer::new(Arc::clone(&interscriber));
    let server = serve_server(handler, stdio()).await?;
    let quit_reason = server.waiting().await;

    interscriber.shutdown();
    quit_reason?;

    Ok(())
}
