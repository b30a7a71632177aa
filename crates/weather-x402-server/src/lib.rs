//! x402 weather resource server — gates a weather lookup behind 402 payments.
//!
//! The payment gate intercepts requests to the protected route, answers
//! HTTP 402 with machine-readable [`PaymentRequirements`](x402::PaymentRequirements)
//! when no proof is supplied, verifies supplied proofs with the facilitator,
//! and settles admitted payments after the handler has produced its response.
//!
//! # Modules
//!
//! - [`config`] — payment configuration resolution ([`resolve_payment_options`](config::resolve_payment_options))
//! - [`gate`] — the payment gate state machine ([`PaymentGate`](gate::PaymentGate))
//! - [`provider`] — the weather provider contract and mock dataset
//! - [`routes`] — HTTP surface: health check and the gated weather route

pub mod config;
pub mod gate;
pub mod provider;
pub mod routes;

pub use config::{resolve_payment_options, PaymentOptions, ResolvedPaymentOptions};
pub use gate::{AdmittedPayment, PaymentGate};
pub use provider::{MockWeatherProvider, ProviderError, WeatherProvider, WeatherRecord};
pub use routes::AppState;
