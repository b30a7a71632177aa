//! Capability traits for the three-party payment model.
//!
//! - [`SigningIdentity`] — client-side: decides which advertised
//!   requirements it can satisfy and produces signed payment proofs
//! - [`FacilitatorClient`] — the resource server's view of the remote
//!   facilitator: capability discovery, verification, settlement
//!
//! Both are narrow on purpose so tests can swap in fakes without touching
//! the protocol flow.

use crate::error::X402Error;
use crate::payment::{PaymentPayload, PaymentRequirements};
use crate::response::{SettleResponse, SupportedKinds, VerifyResponse};
use alloy::primitives::Address;

/// Client-side signing capability: given a private key, knows its address
/// and can sign a payment authorization for a scheme/network it supports.
pub trait SigningIdentity: Send + Sync {
    /// Address payments will be drawn from.
    fn address(&self) -> Address;

    /// Whether this identity can satisfy a `(scheme, network)` pair.
    /// The network may be a concrete CAIP-2 identifier or a wildcard
    /// pattern like `eip155:*` from the advertised requirement.
    fn supports(&self, scheme: &str, network: &str) -> bool;

    /// Create a signed payment proof for the given requirement.
    fn create_payment_payload(
        &self,
        x402_version: u32,
        requirements: &PaymentRequirements,
    ) -> impl std::future::Future<Output = Result<PaymentPayload, X402Error>> + Send;
}

/// Remote facilitator contract. Errors from these methods mean the
/// facilitator could not be consulted at all and must never be conflated
/// with "payment invalid".
#[async_trait::async_trait]
pub trait FacilitatorClient: Send + Sync {
    /// Fetch the `(scheme, network)` kinds this facilitator can handle.
    async fn supported(&self) -> Result<SupportedKinds, X402Error>;

    /// Verify a payment proof against the advertised requirement.
    async fn verify(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<VerifyResponse, X402Error>;

    /// Settle a verified payment. Called at most once per admitted request.
    async fn settle(
        &self,
        payload: &PaymentPayload,
        requirements: &PaymentRequirements,
    ) -> Result<SettleResponse, X402Error>;
}
