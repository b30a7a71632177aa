use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Response from the facilitator's `/verify` endpoint.
///
/// Produced fresh per request; proofs are single-use and time-bound, so
/// verification results are never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<Address>,
}

/// Response from the facilitator's `/settle` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<Address>,
    /// Transaction hash, if settlement succeeded. `None` on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    pub network: String,
}

/// One `(scheme, network)` combination a facilitator can handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedKind {
    pub x402_version: u32,
    pub scheme: String,
    pub network: String,
}

/// Response from the facilitator's `/supported` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedKinds {
    pub kinds: Vec<SupportedKind>,
}

impl SupportedKinds {
    /// Whether the facilitator advertises support for a scheme/network pair.
    pub fn contains(&self, scheme: &str, network: &str) -> bool {
        self.kinds
            .iter()
            .any(|k| k.scheme == scheme && k.network == network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_kinds_contains() {
        let kinds = SupportedKinds {
            kinds: vec![SupportedKind {
                x402_version: 1,
                scheme: "exact".to_string(),
                network: "eip155:84532".to_string(),
            }],
        };
        assert!(kinds.contains("exact", "eip155:84532"));
        assert!(!kinds.contains("exact", "eip155:8453"));
        assert!(!kinds.contains("permit", "eip155:84532"));
    }

    #[test]
    fn test_verify_response_wire_format() {
        let json = r#"{"isValid":false,"invalidReason":"authorization expired"}"#;
        let resp: VerifyResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.is_valid);
        assert_eq!(resp.invalid_reason.as_deref(), Some("authorization expired"));
        assert!(resp.payer.is_none());
    }
}
