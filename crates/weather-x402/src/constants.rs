use alloy::primitives::{address, Address};

/// x402 protocol version carried in wire payloads.
pub const X402_VERSION: u32 = 1;

/// Scheme name for exact-amount EVM transfers.
pub const SCHEME_EXACT: &str = "exact";

/// Request header carrying the base64-encoded payment payload.
pub const HEADER_PAYMENT: &str = "X-PAYMENT";

/// Response header carrying the base64-encoded settlement result.
pub const HEADER_PAYMENT_RESPONSE: &str = "X-PAYMENT-RESPONSE";

/// CAIP-2 network identifier for Base mainnet.
pub const NETWORK_BASE: &str = "eip155:8453";

/// CAIP-2 network identifier for Base Sepolia.
pub const NETWORK_BASE_SEPOLIA: &str = "eip155:84532";

/// USDC on Base mainnet.
pub const USDC_BASE: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

/// USDC on Base Sepolia.
pub const USDC_BASE_SEPOLIA: Address = address!("036CbD53842c5426634e7929541eC2318f3dCF7e");

/// USDC has 6 decimal places.
pub const TOKEN_DECIMALS: u32 = 6;

/// Networks with a known asset, in preference order for wildcard
/// requirements.
pub const KNOWN_NETWORKS: &[&str] = &[NETWORK_BASE, NETWORK_BASE_SEPOLIA];

/// Runtime scheme configuration for one network. Decouples signing and
/// price parsing from compile-time constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeConfig {
    pub chain_id: u64,
    pub network: String,
    pub asset: Address,
    pub token_decimals: u32,
    pub eip712_domain_name: String,
    pub eip712_domain_version: String,
}

impl SchemeConfig {
    /// Resolve the scheme configuration for a known CAIP-2 network
    /// identifier. Returns `None` for networks without a known asset.
    pub fn for_network(network: &str) -> Option<Self> {
        let asset = match network {
            NETWORK_BASE => USDC_BASE,
            NETWORK_BASE_SEPOLIA => USDC_BASE_SEPOLIA,
            _ => return None,
        };
        let chain_id = network
            .strip_prefix("eip155:")
            .and_then(|id| id.parse::<u64>().ok())?;

        Some(Self {
            chain_id,
            network: network.to_string(),
            asset,
            token_decimals: TOKEN_DECIMALS,
            eip712_domain_name: "USDC".to_string(),
            eip712_domain_version: "2".to_string(),
        })
    }
}
