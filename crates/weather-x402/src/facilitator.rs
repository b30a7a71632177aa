//! HTTP client for a remote x402 facilitator.
//!
//! Speaks the standard facilitator surface: `GET /supported`,
//! `POST /verify`, `POST /settle`. Transport failures surface as
//! [`X402Error::ConnectionError`] so the resource server can answer
//! 503 rather than misreporting an unreachable facilitator as an
//! unpaid request.

use crate::constants::X402_VERSION;
use crate::error::X402Error;
use crate::payment::{PaymentPayload, PaymentRequirements};
use crate::response::{SettleResponse, SupportedKinds, VerifyResponse};
use crate::scheme::FacilitatorClient;

/// Facilitator client over HTTP, backed by reqwest.
pub struct HttpFacilitatorClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFacilitatorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_payment<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<T, X402Error> {
        let url = format!("{}/{endpoint}", self.base_url);
        let body = serde_json::json!({
            "x402Version": X402_VERSION,
            "paymentPayload": payload,
            "paymentRequirements": requirements,
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| X402Error::ConnectionError(format!("facilitator request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(X402Error::HttpError(format!(
                "facilitator /{endpoint} returned {}",
                resp.status()
            )));
        }

        resp.json::<T>().await.map_err(|e| {
            X402Error::HttpError(format!("facilitator response parse failed: {e}"))
        })
    }
}

#[async_trait::async_trait]
impl FacilitatorClient for HttpFacilitatorClient {
    async fn supported(&self) -> Result<SupportedKinds, X402Error> {
        let url = format!("{}/supported", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| X402Error::ConnectionError(format!("facilitator request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(X402Error::HttpError(format!(
                "facilitator /supported returned {}",
                resp.status()
            )));
        }

        resp.json::<SupportedKinds>().await.map_err(|e| {
            X402Error::HttpError(format!("facilitator response parse failed: {e}"))
        })
    }

    async fn verify(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, X402Error> {
        self.post_payment("verify", payload, requirements).await
    }

    async fn settle(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResponse, X402Error> {
        self.post_payment("settle", payload, requirements).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = HttpFacilitatorClient::new("https://x402.org/facilitator/");
        assert_eq!(client.base_url(), "https://x402.org/facilitator");
    }

    #[tokio::test]
    async fn test_unreachable_facilitator_is_connection_error() {
        // Port 1 is never listening.
        let client = HttpFacilitatorClient::new("http://127.0.0.1:1");
        let result = client.supported().await;
        assert!(matches!(result, Err(X402Error::ConnectionError(_))));
    }
}
