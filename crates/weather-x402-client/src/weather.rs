//! Typed client for the payment-gated weather endpoint.
//!
//! Maps the protocol-level [`X402Error`] surface into operator-facing
//! messages that name the weather server, so a CLI or MCP tool can show
//! them verbatim.

use serde::{Deserialize, Serialize};

use x402::{ConfigSource, ExactEvmSigner, X402Error};

use crate::config::ClientConfig;
use crate::http_client::{decode_settlement, X402Client};

/// Weather payload as the server serves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub city: String,
    pub condition: String,
    pub temperature_c: i32,
    pub humidity: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherClientError {
    #[error("{0}")]
    Config(String),

    /// The server could not be reached at all.
    #[error("x402server connection failed: {0}")]
    Connection(String),

    /// The payment leg failed: rejected proof, or no satisfiable scheme.
    #[error("x402 payment failed (402): {0}")]
    Payment(String),

    /// The server answered with a non-success status after payment.
    #[error("weather request failed ({status}) at {url}: {detail}{hint}")]
    Request {
        status: u16,
        url: String,
        detail: String,
        hint: String,
    },

    /// The server was reached but answered something the protocol or
    /// the weather payload cannot be parsed from.
    #[error("invalid response from x402server: {0}")]
    Parse(String),
}

impl From<X402Error> for WeatherClientError {
    fn from(e: X402Error) -> Self {
        match e {
            X402Error::ConnectionError(m) => WeatherClientError::Connection(m),
            X402Error::PaymentRejected { reason } => WeatherClientError::Payment(
                reason.unwrap_or_else(|| "payment required".to_string()),
            ),
            X402Error::UnsupportedScheme(m) => WeatherClientError::Payment(m),
            // The server answered; a garbled answer is not a connection
            // failure.
            X402Error::HttpError(m) => WeatherClientError::Parse(m),
            X402Error::SerdeError(e) => WeatherClientError::Parse(e.to_string()),
            other => WeatherClientError::Connection(other.to_string()),
        }
    }
}

/// Pull a human-readable detail out of a JSON error body; servers in the
/// wild use several field names for it.
fn error_detail(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "details", "error"] {
            if let Some(detail) = json.get(field).and_then(|v| v.as_str()) {
                return detail.to_string();
            }
        }
    }
    "unknown error".to_string()
}

/// Paying weather client bound to one server.
#[derive(Debug)]
pub struct WeatherClient {
    client: X402Client<ExactEvmSigner>,
    base_url: url::Url,
}

impl WeatherClient {
    pub fn new(config: &ClientConfig) -> Result<Self, WeatherClientError> {
        let identity = ExactEvmSigner::from_private_key(&config.private_key)
            .map_err(|e| WeatherClientError::Config(e.to_string()))?;
        let base_url = url::Url::parse(config.server_url.trim_end_matches('/'))
            .map_err(|e| WeatherClientError::Config(format!("invalid X402_SERVER_URL: {e}")))?;
        let client =
            X402Client::new(identity).map_err(|e| WeatherClientError::Config(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// Build a client from a configuration source (the process environment
    /// in production).
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self, WeatherClientError> {
        let config = crate::config::resolve_client_config(source)
            .map_err(|e| match e {
                X402Error::ConfigError(m) => WeatherClientError::Config(m),
                other => WeatherClientError::Config(other.to_string()),
            })?;
        Self::new(&config)
    }

    /// Fetch weather for a city, paying the server's challenge if one
    /// comes back.
    pub async fn fetch_weather(&self, city: &str) -> Result<WeatherRecord, WeatherClientError> {
        let mut url = self.base_url.clone();
        url.set_path("/weather");
        url.query_pairs_mut().append_pair("city", city);

        let response = self.client.get(url.as_str()).await?;
        let status = response.status();

        if !status.is_success() {
            let hint = if status == reqwest::StatusCode::NOT_FOUND {
                " (check X402_SERVER_URL points to x402server)"
            } else {
                ""
            };
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherClientError::Request {
                status: status.as_u16(),
                url: url.to_string(),
                detail: error_detail(&body),
                hint: hint.to_string(),
            });
        }

        if let Some(settlement) = decode_settlement(&response) {
            tracing::debug!(
                transaction = settlement.transaction.as_deref().unwrap_or(""),
                network = %settlement.network,
                "payment settled"
            );
        }

        response
            .json::<WeatherRecord>()
            .await
            .map_err(|e| WeatherClientError::Parse(e.to_string()))
    }
}
