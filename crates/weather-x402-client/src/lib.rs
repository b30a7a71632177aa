//! Paying HTTP client for x402-gated resources.
//!
//! [`X402Client`] wraps a reqwest client and a [`SigningIdentity`] and runs
//! the protocol's request flow: send, read the 402 challenge, sign a proof
//! for a requirement the identity supports, retry exactly once with the
//! proof attached. [`WeatherClient`] layers the weather endpoint's typed
//! API and error surface on top.
//!
//! [`SigningIdentity`]: x402::SigningIdentity

pub mod config;
pub mod http_client;
pub mod weather;

pub use config::{resolve_client_config, ClientConfig, KEY_PRIVATE_KEY, KEY_SERVER_URL};
pub use http_client::{decode_settlement, X402Client};
pub use weather::{WeatherClient, WeatherClientError, WeatherRecord};
