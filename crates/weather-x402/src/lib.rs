//! x402 pay-per-request protocol core.
//!
//! Implements HTTP 402 payment gating with the "exact" EVM scheme:
//! EIP-3009 `TransferWithAuthorization` payloads signed via EIP-712 and
//! verified/settled by a remote facilitator service.
//!
//! # Three-party model
//!
//! - **Client** ([`ExactEvmSigner`]) — signs payment authorizations
//! - **Server** (`weather-x402-server`) — gates endpoints, returns 402 with pricing
//! - **Facilitator** ([`HttpFacilitatorClient`]) — verifies proofs and settles on-chain
//!
//! The server never inspects a payment proof beyond its `(scheme, network)`
//! routing fields; verification and settlement are the facilitator's job,
//! reached through the [`FacilitatorClient`] contract.

pub mod config;
pub mod constants;
pub mod eip712;
pub mod error;
pub mod exact;
pub mod facilitator;
pub mod payment;
pub mod response;
pub mod scheme;

use alloy::sol;

// EIP-3009 transfer authorization. The sol! macro derives SolStruct,
// which provides eip712_signing_hash().
sol! {
    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct TransferWithAuthorization {
        address from;
        address to;
        uint256 value;
        uint256 validAfter;
        uint256 validBefore;
        bytes32 nonce;
    }
}

pub use config::{ConfigSource, EnvSource};
pub use constants::{SchemeConfig, HEADER_PAYMENT, HEADER_PAYMENT_RESPONSE, SCHEME_EXACT, X402_VERSION};
pub use error::X402Error;
pub use exact::ExactEvmSigner;
pub use facilitator::HttpFacilitatorClient;
pub use payment::{
    decode_payment, encode_payment, ExactAuthorization, ExactPaymentData, PaymentPayload,
    PaymentRequiredBody, PaymentRequirements,
};
pub use response::{SettleResponse, SupportedKind, SupportedKinds, VerifyResponse};
pub use scheme::{FacilitatorClient, SigningIdentity};
