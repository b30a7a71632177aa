//! The "exact" EVM payment scheme.
//!
//! Client side: [`ExactEvmSigner`] produces EIP-3009 authorizations signed
//! with a local private key. Server side: [`parse_price`] renders a
//! human-readable price into on-chain base units for the advertised
//! requirement.

use alloy::primitives::U256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::constants::{SchemeConfig, KNOWN_NETWORKS, SCHEME_EXACT};
use crate::eip712::{encode_signature_hex, random_nonce, signing_hash};
use crate::error::X402Error;
use crate::payment::{ExactAuthorization, ExactPaymentData, PaymentPayload, PaymentRequirements};
use crate::scheme::SigningIdentity;
use crate::TransferWithAuthorization;

/// Whether a concrete network satisfies a pattern. Patterns are either a
/// concrete CAIP-2 identifier or a `namespace:*` wildcard.
pub fn network_matches(pattern: &str, network: &str) -> bool {
    match pattern.strip_suffix(":*") {
        Some(namespace) => network
            .split_once(':')
            .is_some_and(|(ns, _)| ns == namespace),
        None => pattern == network,
    }
}

/// Resolve a requirement's network pattern to a concrete scheme
/// configuration. A wildcard like `eip155:*` picks the first known
/// network in that namespace.
pub fn resolve_network(pattern: &str) -> Option<SchemeConfig> {
    if let Some(config) = SchemeConfig::for_network(pattern) {
        return Some(config);
    }
    KNOWN_NETWORKS
        .iter()
        .find(|network| network_matches(pattern, network))
        .and_then(|network| SchemeConfig::for_network(network))
}

/// Parse a human-readable price string (e.g. "$0.001") into base units
/// for an asset with `decimals` decimal places. Integer-only arithmetic;
/// no floats anywhere in the pipeline.
pub fn parse_price(price: &str, decimals: u32) -> Result<String, X402Error> {
    // Strip non-numeric characters (except '.') — handles "$0.001", "0.01", "$1", etc.
    let cleaned: String = price
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Err(X402Error::InvalidPayment(format!(
            "invalid price '{price}': no numeric content"
        )));
    }

    let multiplier = 10u64.pow(decimals);

    let amount = match cleaned.split_once('.') {
        Some((integer_part, fractional_part)) => {
            let integer: u64 = if integer_part.is_empty() {
                0
            } else {
                integer_part.parse::<u64>().map_err(|e| {
                    X402Error::InvalidPayment(format!("invalid price '{price}': integer part: {e}"))
                })?
            };

            // Truncate the fractional part beyond the asset's precision.
            let decimals = decimals as usize;
            let frac_str = if fractional_part.len() >= decimals {
                &fractional_part[..decimals]
            } else {
                fractional_part
            };

            let fractional: u64 = if frac_str.is_empty() {
                0
            } else {
                frac_str.parse::<u64>().map_err(|e| {
                    X402Error::InvalidPayment(format!(
                        "invalid price '{price}': fractional part: {e}"
                    ))
                })?
            };

            // Scale up if the fractional part had fewer digits than the asset precision.
            let scale = 10u64.pow((decimals - frac_str.len()) as u32);

            let integer_units = integer.checked_mul(multiplier).ok_or_else(|| {
                X402Error::InvalidPayment(format!("invalid price '{price}': overflow"))
            })?;
            let fractional_units = fractional.checked_mul(scale).ok_or_else(|| {
                X402Error::InvalidPayment(format!("invalid price '{price}': overflow"))
            })?;
            integer_units.checked_add(fractional_units).ok_or_else(|| {
                X402Error::InvalidPayment(format!("invalid price '{price}': overflow"))
            })?
        }
        None => {
            let integer: u64 = cleaned
                .parse::<u64>()
                .map_err(|e| X402Error::InvalidPayment(format!("invalid price '{price}': {e}")))?;
            integer.checked_mul(multiplier).ok_or_else(|| {
                X402Error::InvalidPayment(format!("invalid price '{price}': overflow"))
            })?
        }
    };

    Ok(amount.to_string())
}

/// Signing identity for the exact-EVM scheme, backed by a local private key.
#[derive(Debug)]
pub struct ExactEvmSigner {
    signer: PrivateKeySigner,
}

impl ExactEvmSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    /// Parse a hex private key into a signer.
    pub fn from_private_key(private_key: &str) -> Result<Self, X402Error> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| X402Error::ConfigError(format!("CLIENT_PRIVATE_KEY is invalid: {e}")))?;
        Ok(Self { signer })
    }
}

impl SigningIdentity for ExactEvmSigner {
    fn address(&self) -> alloy::primitives::Address {
        self.signer.address()
    }

    fn supports(&self, scheme: &str, network: &str) -> bool {
        scheme == SCHEME_EXACT && resolve_network(network).is_some()
    }

    async fn create_payment_payload(
        &self,
        x402_version: u32,
        requirements: &PaymentRequirements,
    ) -> Result<PaymentPayload, X402Error> {
        let config = resolve_network(&requirements.network).ok_or_else(|| {
            X402Error::UnsupportedScheme(format!("unknown network: {}", requirements.network))
        })?;

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| X402Error::ConfigError(format!("system time error: {e}")))?
            .as_secs();

        // Small backdated window to tolerate clock skew between parties.
        let valid_after = now.saturating_sub(60);
        let valid_before = now + requirements.max_timeout_seconds;

        let nonce = random_nonce();

        let value = requirements
            .amount
            .parse::<U256>()
            .map_err(|e| X402Error::InvalidPayment(format!("invalid amount: {e}")))?;

        let auth = TransferWithAuthorization {
            from: self.signer.address(),
            to: requirements.pay_to,
            value,
            validAfter: U256::from(valid_after),
            validBefore: U256::from(valid_before),
            nonce,
        };

        let hash = signing_hash(&auth, &config);
        let sig = self
            .signer
            .sign_hash_sync(&hash)
            .map_err(|e| X402Error::SignatureError(format!("signing failed: {e}")))?;

        // The payload always names a concrete network, even when the
        // requirement advertised a wildcard.
        Ok(PaymentPayload {
            x402_version,
            scheme: requirements.scheme.clone(),
            network: config.network.clone(),
            payload: ExactPaymentData {
                signature: encode_signature_hex(&sig),
                authorization: ExactAuthorization {
                    from: self.signer.address(),
                    to: requirements.pay_to,
                    value: requirements.amount.clone(),
                    valid_after: valid_after.to_string(),
                    valid_before: valid_before.to_string(),
                    nonce,
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{NETWORK_BASE_SEPOLIA, USDC_BASE_SEPOLIA};
    use alloy::primitives::Address;

    fn sample_requirements() -> PaymentRequirements {
        PaymentRequirements {
            scheme: SCHEME_EXACT.to_string(),
            network: NETWORK_BASE_SEPOLIA.to_string(),
            price: "$0.001".to_string(),
            asset: USDC_BASE_SEPOLIA,
            amount: "1000".to_string(),
            pay_to: Address::ZERO,
            max_timeout_seconds: 60,
            description: None,
            mime_type: None,
        }
    }

    #[test]
    fn test_network_matches_exact() {
        assert!(network_matches("eip155:84532", "eip155:84532"));
        assert!(!network_matches("eip155:84532", "eip155:8453"));
    }

    #[test]
    fn test_network_matches_wildcard() {
        assert!(network_matches("eip155:*", "eip155:84532"));
        assert!(network_matches("eip155:*", "eip155:8453"));
        assert!(!network_matches("eip155:*", "solana:mainnet"));
        assert!(!network_matches("eip155:*", "eip155"));
    }

    #[test]
    fn test_parse_dollar_price() {
        assert_eq!(parse_price("$0.001", 6).unwrap(), "1000");
    }

    #[test]
    fn test_parse_numeric_price() {
        assert_eq!(parse_price("0.01", 6).unwrap(), "10000");
    }

    #[test]
    fn test_parse_whole_dollar() {
        assert_eq!(parse_price("$1", 6).unwrap(), "1000000");
    }

    #[test]
    fn test_parse_six_decimals() {
        assert_eq!(parse_price("0.000001", 6).unwrap(), "1");
    }

    #[test]
    fn test_parse_truncates_beyond_decimals() {
        assert_eq!(parse_price("0.0000019", 6).unwrap(), "1");
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(parse_price("$", 6).is_err());
    }

    #[test]
    fn test_parse_overflow_fails() {
        assert!(parse_price("$99999999999999999999", 6).is_err());
    }

    #[test]
    fn test_supports_exact_on_known_networks() {
        let identity = ExactEvmSigner::new(PrivateKeySigner::random());
        assert!(identity.supports("exact", NETWORK_BASE_SEPOLIA));
        assert!(!identity.supports("permit", NETWORK_BASE_SEPOLIA));
        assert!(!identity.supports("exact", "eip155:1"));
    }

    #[test]
    fn test_supports_wildcard_requirement() {
        let identity = ExactEvmSigner::new(PrivateKeySigner::random());
        assert!(identity.supports("exact", "eip155:*"));
        assert!(!identity.supports("exact", "solana:*"));
        assert!(!identity.supports("permit", "eip155:*"));
    }

    #[test]
    fn test_resolve_network_wildcard_picks_known_network() {
        assert_eq!(
            resolve_network("eip155:*").unwrap().network,
            crate::constants::NETWORK_BASE
        );
        assert_eq!(
            resolve_network(NETWORK_BASE_SEPOLIA).unwrap().network,
            NETWORK_BASE_SEPOLIA
        );
        assert!(resolve_network("solana:*").is_none());
    }

    #[tokio::test]
    async fn test_create_payment_payload() {
        let signer = PrivateKeySigner::random();
        let address = signer.address();
        let identity = ExactEvmSigner::new(signer);

        let payload = identity
            .create_payment_payload(1, &sample_requirements())
            .await
            .unwrap();

        assert_eq!(payload.x402_version, 1);
        assert_eq!(payload.scheme, "exact");
        assert_eq!(payload.network, NETWORK_BASE_SEPOLIA);
        assert_eq!(payload.payload.authorization.from, address);
        assert_eq!(payload.payload.authorization.value, "1000");
        assert!(payload.payload.signature.starts_with("0x"));
        assert_eq!(payload.payload.signature.len(), 132); // 0x + 130 hex chars
    }

    #[tokio::test]
    async fn test_wildcard_requirement_signs_for_concrete_network() {
        let identity = ExactEvmSigner::new(PrivateKeySigner::random());
        let requirements = PaymentRequirements {
            network: "eip155:*".to_string(),
            ..sample_requirements()
        };

        let payload = identity
            .create_payment_payload(1, &requirements)
            .await
            .unwrap();

        assert_eq!(payload.network, crate::constants::NETWORK_BASE);
        assert_eq!(payload.payload.signature.len(), 132);
    }

    #[tokio::test]
    async fn test_signed_payload_recovers_signer() {
        let signer = PrivateKeySigner::random();
        let address = signer.address();
        let identity = ExactEvmSigner::new(signer);
        let requirements = sample_requirements();

        let payload = identity
            .create_payment_payload(1, &requirements)
            .await
            .unwrap();

        let auth = &payload.payload.authorization;
        let typed = TransferWithAuthorization {
            from: auth.from,
            to: auth.to,
            value: auth.value.parse().unwrap(),
            validAfter: U256::from(auth.valid_after.parse::<u64>().unwrap()),
            validBefore: U256::from(auth.valid_before.parse::<u64>().unwrap()),
            nonce: auth.nonce,
        };
        let sig_bytes =
            alloy::hex::decode(payload.payload.signature.strip_prefix("0x").unwrap()).unwrap();
        let config = SchemeConfig::for_network(NETWORK_BASE_SEPOLIA).unwrap();
        let recovered = crate::eip712::verify_signature(&typed, &sig_bytes, &config).unwrap();
        assert_eq!(recovered, address);
    }
}
