//! The paying request flow.

use base64::Engine;
use std::time::Duration;

use x402::{
    encode_payment, PaymentRequiredBody, SettleResponse, SigningIdentity, X402Error,
    HEADER_PAYMENT, HEADER_PAYMENT_RESPONSE,
};

/// HTTP client that satisfies x402 challenges with a signing identity.
///
/// One challenge, one signed retry: a second 402 after the proof was
/// attached is terminal and surfaces as [`X402Error::PaymentRejected`].
#[derive(Debug)]
pub struct X402Client<S> {
    http: reqwest::Client,
    identity: S,
}

impl<S: SigningIdentity> X402Client<S> {
    pub fn new(identity: S) -> Result<Self, X402Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| X402Error::ConfigError(format!("http client build failed: {e}")))?;
        Ok(Self { http, identity })
    }

    /// GET a possibly-gated resource, paying if challenged.
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, X402Error> {
        self.fetch(reqwest::Method::GET, url).await
    }

    /// Request a possibly-gated resource without a body.
    pub async fn fetch(
        &self,
        method: reqwest::Method,
        url: &str,
    ) -> Result<reqwest::Response, X402Error> {
        self.fetch_with_body(method, url, None).await
    }

    /// Request a possibly-gated resource, paying if challenged. The
    /// retry replays the same method and JSON body with the proof
    /// attached. Returns the final response for every status except a
    /// post-payment 402, which becomes [`X402Error::PaymentRejected`].
    pub async fn fetch_with_body(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, X402Error> {
        let request = |payment: Option<&str>| {
            let mut builder = self.http.request(method.clone(), url);
            if let Some(body) = body {
                builder = builder.json(body);
            }
            if let Some(header) = payment {
                builder = builder.header(HEADER_PAYMENT, header);
            }
            builder
        };

        let response = request(None)
            .send()
            .await
            .map_err(|e| X402Error::ConnectionError(e.to_string()))?;

        if response.status() != reqwest::StatusCode::PAYMENT_REQUIRED {
            return Ok(response);
        }

        let challenge: PaymentRequiredBody = response
            .json()
            .await
            .map_err(|e| X402Error::HttpError(format!("failed to parse 402 challenge: {e}")))?;

        let requirement = challenge
            .accepts
            .iter()
            .find(|r| self.identity.supports(&r.scheme, &r.network))
            .ok_or_else(|| {
                let offered: Vec<(&str, &str)> = challenge
                    .accepts
                    .iter()
                    .map(|r| (r.scheme.as_str(), r.network.as_str()))
                    .collect();
                X402Error::UnsupportedScheme(format!("no supported scheme found in {offered:?}"))
            })?;

        tracing::debug!(
            scheme = %requirement.scheme,
            network = %requirement.network,
            amount = %requirement.amount,
            "paying 402 challenge"
        );

        let payload = self
            .identity
            .create_payment_payload(challenge.x402_version, requirement)
            .await?;
        let header = encode_payment(&payload)?;

        let retry = request(Some(&header))
            .send()
            .await
            .map_err(|e| X402Error::ConnectionError(e.to_string()))?;

        if retry.status() == reqwest::StatusCode::PAYMENT_REQUIRED {
            // Best-effort reason extraction; the rejection stands either way.
            let reason = retry
                .json::<PaymentRequiredBody>()
                .await
                .ok()
                .and_then(|body| body.invalid_reason);
            return Err(X402Error::PaymentRejected { reason });
        }

        Ok(retry)
    }
}

/// Parse an X-PAYMENT-RESPONSE header value. Servers send base64-encoded
/// JSON; plain JSON is accepted as a fallback.
pub fn parse_settlement_header(value: &str) -> Option<SettleResponse> {
    if let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(value) {
        if let Ok(settlement) = serde_json::from_slice(&bytes) {
            return Some(settlement);
        }
    }
    serde_json::from_str(value).ok()
}

/// Read the settlement receipt off a paid response, if the server attached
/// one. Absence is normal: settlement may have failed server-side without
/// failing the response.
pub fn decode_settlement(response: &reqwest::Response) -> Option<SettleResponse> {
    let value = response
        .headers()
        .get(HEADER_PAYMENT_RESPONSE)?
        .to_str()
        .ok()?;
    parse_settlement_header(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_settlement_json() -> String {
        serde_json::json!({
            "success": true,
            "transaction": "0xabc123",
            "network": "eip155:84532",
        })
        .to_string()
    }

    #[test]
    fn test_parse_base64_settlement() {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(sample_settlement_json());
        let settlement = parse_settlement_header(&encoded).unwrap();
        assert!(settlement.success);
        assert_eq!(settlement.transaction.as_deref(), Some("0xabc123"));
    }

    #[test]
    fn test_parse_plain_json_settlement() {
        let settlement = parse_settlement_header(&sample_settlement_json()).unwrap();
        assert!(settlement.success);
        assert_eq!(settlement.network, "eip155:84532");
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_settlement_header("definitely not a receipt").is_none());
    }
}
