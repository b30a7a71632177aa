//! Client-side configuration resolution.

use x402::{ConfigSource, X402Error};

/// Environment keys consumed by the resolver.
pub const KEY_PRIVATE_KEY: &str = "CLIENT_PRIVATE_KEY";
pub const KEY_SERVER_URL: &str = "X402_SERVER_URL";

/// Resolved client configuration: the payer's key and the resource server
/// to call. The key stays a raw string here; it is only parsed when the
/// signing identity is built.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub private_key: String,
    pub server_url: String,
}

fn required(source: &dyn ConfigSource, key: &str) -> Result<String, X402Error> {
    match source.get(key) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(X402Error::ConfigError(format!("{key} is required"))),
    }
}

/// Resolve client configuration from a source. Both fields are required;
/// there is no default payer key and no default server.
pub fn resolve_client_config(source: &dyn ConfigSource) -> Result<ClientConfig, X402Error> {
    Ok(ClientConfig {
        private_key: required(source, KEY_PRIVATE_KEY)?,
        server_url: required(source, KEY_SERVER_URL)?,
    })
}
