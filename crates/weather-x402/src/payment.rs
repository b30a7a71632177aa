use alloy::primitives::{Address, FixedBytes};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::X402Error;

/// EIP-3009 authorization fields as they travel on the wire.
/// Numeric fields are decimal strings to avoid JSON precision loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactAuthorization {
    pub from: Address,
    pub to: Address,
    pub value: String,
    pub valid_after: String,
    pub valid_before: String,
    pub nonce: FixedBytes<32>,
}

/// Exact-scheme payment data: a signature over an [`ExactAuthorization`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactPaymentData {
    pub signature: String,
    pub authorization: ExactAuthorization,
}

/// Wire-format payment proof (sent in the X-PAYMENT header, base64-encoded
/// JSON). The `scheme`/`network` pair routes the proof to the advertised
/// requirement it claims to satisfy; the payload itself is opaque to the
/// resource server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub x402_version: u32,
    pub scheme: String,
    pub network: String,
    pub payload: ExactPaymentData,
}

/// A single entry in the `accepts` array of a 402 response.
///
/// Immutable once built from server configuration; `amount` is the
/// on-chain base-unit rendering of the human-readable `price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    pub scheme: String,
    pub network: String,
    pub price: String,
    pub asset: Address,
    pub amount: String,
    pub pay_to: Address,
    pub max_timeout_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// The 402 response body returned by the resource server.
///
/// `invalid_reason` is absent on the protocol's normal opening move (no
/// proof supplied) and present when a supplied proof was rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequiredBody {
    pub x402_version: u32,
    pub accepts: Vec<PaymentRequirements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
}

/// Base64-encode a payment payload for the X-PAYMENT header.
pub fn encode_payment(payload: &PaymentPayload) -> Result<String, X402Error> {
    let json = serde_json::to_vec(payload)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(&json))
}

/// Decode a payment payload from the X-PAYMENT header.
pub fn decode_payment(encoded: &str) -> Result<PaymentPayload, X402Error> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| X402Error::InvalidPayment(format!("invalid base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| X402Error::InvalidPayment(format!("invalid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{NETWORK_BASE_SEPOLIA, SCHEME_EXACT, USDC_BASE_SEPOLIA};

    fn sample_payload() -> PaymentPayload {
        PaymentPayload {
            x402_version: 1,
            scheme: SCHEME_EXACT.to_string(),
            network: NETWORK_BASE_SEPOLIA.to_string(),
            payload: ExactPaymentData {
                signature: "0xdead".to_string(),
                authorization: ExactAuthorization {
                    from: Address::ZERO,
                    to: Address::ZERO,
                    value: "1000".to_string(),
                    valid_after: "0".to_string(),
                    valid_before: "18446744073709551615".to_string(),
                    nonce: FixedBytes::ZERO,
                },
            },
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let payload = sample_payload();
        let encoded = encode_payment(&payload).unwrap();
        let decoded = decode_payment(&encoded).unwrap();

        assert_eq!(decoded.x402_version, payload.x402_version);
        assert_eq!(decoded.scheme, "exact");
        assert_eq!(decoded.network, NETWORK_BASE_SEPOLIA);
        assert_eq!(decoded.payload.authorization.value, "1000");
        assert_eq!(decoded.payload.signature, "0xdead");
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let result = decode_payment("not-valid-base64!!!");
        assert!(matches!(result, Err(X402Error::InvalidPayment(_))));
    }

    #[test]
    fn test_decode_rejects_bad_json() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"this is not json");
        let result = decode_payment(&encoded);
        assert!(matches!(result, Err(X402Error::InvalidPayment(_))));
    }

    #[test]
    fn test_requirements_serialize_camel_case() {
        let req = PaymentRequirements {
            scheme: SCHEME_EXACT.to_string(),
            network: NETWORK_BASE_SEPOLIA.to_string(),
            price: "$0.001".to_string(),
            asset: USDC_BASE_SEPOLIA,
            amount: "1000".to_string(),
            pay_to: Address::ZERO,
            max_timeout_seconds: 60,
            description: Some("Access weather data".to_string()),
            mime_type: Some("application/json".to_string()),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("payTo").is_some());
        assert!(json.get("mimeType").is_some());
        assert!(json.get("maxTimeoutSeconds").is_some());
        assert!(json.get("pay_to").is_none());
    }

    #[test]
    fn test_payment_required_body_omits_absent_reason() {
        let body = PaymentRequiredBody {
            x402_version: 1,
            accepts: vec![],
            invalid_reason: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("invalidReason").is_none());

        let body = PaymentRequiredBody {
            invalid_reason: Some("expired".to_string()),
            ..body
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["invalidReason"], "expired");
    }
}
