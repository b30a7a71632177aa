//! EIP-712 typed-data signing for EIP-3009 transfer authorizations.
//!
//! Provides domain construction, signing-hash computation, signature
//! verification with EIP-2 malleability protection, nonce generation,
//! and signature hex encoding.

use alloy::primitives::{Address, FixedBytes, Signature, B256, U256};
use alloy::sol_types::SolStruct;

use crate::constants::SchemeConfig;
use crate::error::X402Error;
use crate::TransferWithAuthorization;

/// Build the EIP-712 domain for a scheme configuration. The asset contract
/// is the verifying contract.
pub fn payment_domain(config: &SchemeConfig) -> alloy::sol_types::Eip712Domain {
    alloy::sol_types::Eip712Domain {
        name: Some(std::borrow::Cow::Owned(config.eip712_domain_name.clone())),
        version: Some(std::borrow::Cow::Owned(
            config.eip712_domain_version.clone(),
        )),
        chain_id: Some(U256::from(config.chain_id)),
        verifying_contract: Some(config.asset),
        salt: None,
    }
}

/// Compute the EIP-712 signing hash for an authorization.
pub fn signing_hash(auth: &TransferWithAuthorization, config: &SchemeConfig) -> B256 {
    let domain = payment_domain(config);
    auth.eip712_signing_hash(&domain)
}

/// secp256k1 curve order N / 2 — signatures with s > this are malleable (EIP-2).
const SECP256K1_N_DIV_2: U256 = U256::from_limbs([
    0xBFD25E8CD0364140,
    0xBAAEDCE6AF48A03B,
    0xFFFFFFFFFFFFFFFE,
    0x7FFFFFFFFFFFFFFF,
]);

/// Verify an EIP-712 signature and return the recovered signer address.
/// Rejects high-s signatures to prevent malleability (EIP-2).
pub fn verify_signature(
    auth: &TransferWithAuthorization,
    signature_bytes: &[u8],
    config: &SchemeConfig,
) -> Result<Address, X402Error> {
    if signature_bytes.len() != 65 {
        return Err(X402Error::SignatureError(format!(
            "signature must be 65 bytes, got {}",
            signature_bytes.len()
        )));
    }

    let sig = Signature::from_raw(signature_bytes)
        .map_err(|e| X402Error::SignatureError(format!("invalid signature: {e}")))?;

    if sig.s() > SECP256K1_N_DIV_2 {
        return Err(X402Error::SignatureError(
            "high-s signature rejected (EIP-2 malleability)".to_string(),
        ));
    }

    let hash = signing_hash(auth, config);
    sig.recover_address_from_prehash(&hash)
        .map_err(|e| X402Error::SignatureError(format!("recovery failed: {e}")))
}

/// Generate a random 32-byte nonce (keccak256 of 32 random bytes).
/// Uses `rand::fill` which delegates to the OS CSPRNG.
pub fn random_nonce() -> FixedBytes<32> {
    use alloy::primitives::keccak256;
    let mut bytes = [0u8; 32];
    rand::fill(&mut bytes);
    keccak256(bytes)
}

/// Encode a Signature to a hex string with 0x prefix (65 bytes -> 0x + 130 hex).
pub fn encode_signature_hex(sig: &Signature) -> String {
    let bytes = sig.as_bytes();
    format!("0x{}", alloy::hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NETWORK_BASE_SEPOLIA;
    use alloy::primitives::{Address, FixedBytes, U256};
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    fn test_config() -> SchemeConfig {
        SchemeConfig::for_network(NETWORK_BASE_SEPOLIA).unwrap()
    }

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let signer: PrivateKeySigner = PrivateKeySigner::random();
        let addr = signer.address();
        let config = test_config();

        let auth = TransferWithAuthorization {
            from: addr,
            to: Address::ZERO,
            value: U256::from(1000u64),
            validAfter: U256::from(0u64),
            validBefore: U256::from(u64::MAX),
            nonce: FixedBytes::ZERO,
        };

        let hash = signing_hash(&auth, &config);
        let sig = signer.sign_hash_sync(&hash).unwrap();
        let sig_hex = encode_signature_hex(&sig);
        let sig_bytes = alloy::hex::decode(sig_hex.strip_prefix("0x").unwrap()).unwrap();

        let recovered = verify_signature(&auth, &sig_bytes, &config).unwrap();
        assert_eq!(recovered, addr);
    }

    #[test]
    fn test_wrong_length_signature_rejected() {
        let auth = TransferWithAuthorization {
            from: Address::ZERO,
            to: Address::ZERO,
            value: U256::ZERO,
            validAfter: U256::ZERO,
            validBefore: U256::ZERO,
            nonce: FixedBytes::ZERO,
        };
        let result = verify_signature(&auth, &[0u8; 10], &test_config());
        assert!(matches!(result, Err(X402Error::SignatureError(_))));
    }

    #[test]
    fn test_random_nonce_is_unique() {
        let n1 = random_nonce();
        let n2 = random_nonce();
        assert_ne!(n1, n2);
    }
}
