//! weather-x402-mcp: MCP server for the paid weather endpoint
//!
//! Run with: `weather-x402-mcp` (serves on stdio)

use rmcp::ServiceExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use x402_mcp::WeatherToolServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they don't interfere with the stdio transport.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting weather-x402-mcp server");

    let server = WeatherToolServer::new();
    let service = server.serve(rmcp::transport::stdio()).await?;

    service.waiting().await?;

    tracing::info!("weather-x402-mcp server stopped");
    Ok(())
}
