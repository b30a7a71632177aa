use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::*,
    ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use x402::EnvSource;
use x402_client::{WeatherClient, WeatherRecord};

/// MCP server exposing the paid weather endpoint as a single tool.
///
/// The tool client is rebuilt from the environment on every call, so a
/// fixed configuration mistake does not require restarting the server.
#[derive(Debug)]
pub struct WeatherToolServer {
    pub tool_router: ToolRouter<Self>,
}

impl Default for WeatherToolServer {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherToolServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetWeatherParams {
    #[schemars(description = "City to get weather for (e.g. \"Tokyo\")")]
    pub city: String,
}

pub fn format_weather_text(record: &WeatherRecord) -> String {
    format!(
        "City: {}\nCondition: {}\nTemperature: {}°C\nHumidity: {}%",
        record.city, record.condition, record.temperature_c, record.humidity
    )
}

fn tool_error(message: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message)])
}

#[rmcp::tool_router]
impl WeatherToolServer {
    #[rmcp::tool(
        description = "Get current weather for a city from the x402-gated weather server, paying the per-request price automatically"
    )]
    pub async fn get_weather(
        &self,
        Parameters(params): Parameters<GetWeatherParams>,
    ) -> Result<CallToolResult, McpError> {
        let client = match WeatherClient::from_source(&EnvSource) {
            Ok(client) => client,
            Err(e) => {
                tracing::error!(error = %e, "weather client configuration failed");
                return Ok(tool_error(format!("Failed to fetch weather: {e}")));
            }
        };

        match client.fetch_weather(&params.city).await {
            Ok(record) => {
                tracing::info!(city = %record.city, "weather fetched");
                Ok(CallToolResult::success(vec![Content::text(
                    format_weather_text(&record),
                )]))
            }
            Err(e) => {
                tracing::warn!(error = %e, city = %params.city, "weather fetch failed");
                Ok(tool_error(format!("Failed to fetch weather: {e}")))
            }
        }
    }
}

#[rmcp::tool_handler]
impl ServerHandler for WeatherToolServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Weather tool backed by an x402 pay-per-request server. Each call \
                 signs a USDC payment authorization with CLIENT_PRIVATE_KEY and \
                 fetches from X402_SERVER_URL."
                    .into(),
            ),
        }
    }
}
