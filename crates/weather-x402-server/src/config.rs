//! Payment configuration resolution.
//!
//! Every payment-critical field resolves from an explicit override first,
//! then the configuration source (the process environment in production).
//! A field missing from both is a startup-time fatal error; nothing here
//! ever falls back to a default payee, price, or network.

use std::sync::Arc;

use alloy::primitives::Address;
use x402::{ConfigSource, FacilitatorClient, HttpFacilitatorClient, X402Error};

/// Environment keys consumed by the resolver.
pub const KEY_PAY_TO: &str = "SERVER_WALLET_ADDRESS";
pub const KEY_FACILITATOR_URL: &str = "FACILITATOR_URL";
pub const KEY_PRICE: &str = "X402_PRICE_USD";
pub const KEY_NETWORK: &str = "X402_NETWORK";

/// Explicit overrides for payment configuration. Any field left `None`
/// falls back to the configuration source.
#[derive(Default)]
pub struct PaymentOptions {
    pub pay_to: Option<String>,
    pub facilitator_url: Option<String>,
    pub price: Option<String>,
    pub network: Option<String>,
    /// Injected facilitator, used by tests. When `None`, an
    /// [`HttpFacilitatorClient`] is built from `facilitator_url`.
    pub facilitator_client: Option<Arc<dyn FacilitatorClient>>,
}

/// Fully-resolved, validated payment configuration for one server
/// instance. Created once at startup; every request reads the same
/// instance.
#[derive(Clone)]
pub struct ResolvedPaymentOptions {
    pub pay_to: Address,
    pub facilitator_url: String,
    pub price: String,
    pub network: String,
    facilitator_client: Option<Arc<dyn FacilitatorClient>>,
}

impl std::fmt::Debug for ResolvedPaymentOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedPaymentOptions")
            .field("pay_to", &self.pay_to)
            .field("facilitator_url", &self.facilitator_url)
            .field("price", &self.price)
            .field("network", &self.network)
            .field("facilitator_client", &self.facilitator_client.is_some())
            .finish()
    }
}

impl ResolvedPaymentOptions {
    /// The facilitator this server verifies and settles against:
    /// the injected client when present, otherwise HTTP against the
    /// resolved facilitator URL.
    pub fn facilitator(&self) -> Arc<dyn FacilitatorClient> {
        match &self.facilitator_client {
            Some(client) => Arc::clone(client),
            None => Arc::new(HttpFacilitatorClient::new(&self.facilitator_url)),
        }
    }
}

fn required(
    override_value: Option<String>,
    source: &dyn ConfigSource,
    key: &str,
) -> Result<String, X402Error> {
    let value = override_value.or_else(|| source.get(key));
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(X402Error::ConfigError(format!(
            "Missing required payment configuration: {key}"
        ))),
    }
}

/// Rewrite the known legacy facilitator hostname to its canonical
/// path-based form; all other URLs pass through unchanged.
pub fn normalize_facilitator_url(raw: &str) -> Result<String, X402Error> {
    let trimmed = raw.trim();

    if trimmed == "https://facilitator.x402.org" {
        return Ok("https://x402.org/facilitator".to_string());
    }

    let mut parsed = url::Url::parse(trimmed)
        .map_err(|e| X402Error::ConfigError(format!("invalid {KEY_FACILITATOR_URL}: {e}")))?;
    if parsed.host_str() == Some("x402.org") && parsed.path() == "/" {
        parsed.set_path("/facilitator");
        return Ok(parsed.to_string().trim_end_matches('/').to_string());
    }

    Ok(trimmed.to_string())
}

/// Resolve payment options with override-then-source precedence,
/// normalizing the facilitator URL and validating the payee address.
pub fn resolve_payment_options(
    payment: PaymentOptions,
    source: &dyn ConfigSource,
) -> Result<ResolvedPaymentOptions, X402Error> {
    let facilitator_url = required(payment.facilitator_url, source, KEY_FACILITATOR_URL)?;
    let pay_to_raw = required(payment.pay_to, source, KEY_PAY_TO)?;

    let pay_to: Address = pay_to_raw
        .parse()
        .map_err(|e| X402Error::ConfigError(format!("invalid {KEY_PAY_TO}: {e}")))?;

    Ok(ResolvedPaymentOptions {
        pay_to,
        facilitator_url: normalize_facilitator_url(&facilitator_url)?,
        price: required(payment.price, source, KEY_PRICE)?,
        network: required(payment.network, source, KEY_NETWORK)?,
        facilitator_client: payment.facilitator_client,
    })
}
