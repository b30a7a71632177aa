//! The payment gate state machine.
//!
//! Built once per server instance from [`ResolvedPaymentOptions`]; every
//! protected request flows through [`PaymentGate::admit`] before the
//! handler runs, and exactly one [`PaymentGate::settle`] call follows an
//! admitted request once the handler's response exists.

use actix_web::{HttpRequest, HttpResponse};
use tokio::sync::OnceCell;

use std::sync::Arc;

use x402::{
    decode_payment, FacilitatorClient, PaymentPayload, PaymentRequiredBody, PaymentRequirements,
    SchemeConfig, SettleResponse, SupportedKinds, X402Error, HEADER_PAYMENT, SCHEME_EXACT,
    X402_VERSION,
};

use crate::config::ResolvedPaymentOptions;

/// Proof that [`PaymentGate::admit`] verified a payment for this request.
/// Consumed by [`PaymentGate::settle`], so settlement cannot run twice.
pub struct AdmittedPayment {
    payload: PaymentPayload,
}

/// Gates the protected route: advertises requirements, verifies supplied
/// proofs with the facilitator, and settles admitted payments.
pub struct PaymentGate {
    requirements: PaymentRequirements,
    facilitator: Arc<dyn FacilitatorClient>,
    /// Lazily-fetched facilitator capabilities. `OnceCell` gives the
    /// single-flight behavior: concurrent first requests share one fetch,
    /// and a failed fetch leaves the cell empty so a later request retries.
    supported: OnceCell<SupportedKinds>,
}

impl PaymentGate {
    /// Build the gate from resolved configuration. Parses the price into
    /// on-chain units up front so a bad price fails at startup, not per
    /// request.
    pub fn new(options: &ResolvedPaymentOptions) -> Result<Self, X402Error> {
        let config = SchemeConfig::for_network(&options.network).ok_or_else(|| {
            X402Error::ConfigError(format!("unsupported network: {}", options.network))
        })?;
        let amount = x402::exact::parse_price(&options.price, config.token_decimals)?;

        Ok(Self {
            requirements: PaymentRequirements {
                scheme: SCHEME_EXACT.to_string(),
                network: options.network.clone(),
                price: options.price.clone(),
                asset: config.asset,
                amount,
                pay_to: options.pay_to,
                max_timeout_seconds: 60,
                description: Some("Access weather data".to_string()),
                mime_type: Some("application/json".to_string()),
            },
            facilitator: options.facilitator(),
            supported: OnceCell::new(),
        })
    }

    /// The requirement set advertised in 402 responses.
    pub fn requirements(&self) -> &PaymentRequirements {
        &self.requirements
    }

    async fn supported_kinds(&self) -> Result<&SupportedKinds, X402Error> {
        self.supported
            .get_or_try_init(|| async {
                let kinds = self.facilitator.supported().await?;
                tracing::info!(kinds = kinds.kinds.len(), "facilitator capabilities fetched");
                Ok(kinds)
            })
            .await
    }

    fn payment_required(&self, invalid_reason: Option<String>) -> HttpResponse {
        HttpResponse::PaymentRequired().json(PaymentRequiredBody {
            x402_version: X402_VERSION,
            accepts: vec![self.requirements.clone()],
            invalid_reason,
        })
    }

    fn facilitator_unavailable() -> HttpResponse {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "statusCode": 503,
            "message": "payment facilitator unavailable",
        }))
    }

    /// Run the gate for one request. `Ok` means the facilitator verified
    /// the supplied proof against the advertised requirement and the
    /// wrapped handler may run; `Err` carries the response to return
    /// instead (402 or 503).
    pub async fn admit(&self, req: &HttpRequest) -> Result<AdmittedPayment, HttpResponse> {
        let header = req
            .headers()
            .get(HEADER_PAYMENT)
            .and_then(|v| v.to_str().ok());

        // No proof is the protocol's normal opening move, not an error.
        let header = match header {
            Some(h) => h,
            None => {
                tracing::debug!(path = req.path(), "no payment supplied, advertising requirements");
                return Err(self.payment_required(None));
            }
        };

        let payload = match decode_payment(header) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "undecodable payment header");
                return Err(self.payment_required(Some(format!("invalid payment header: {e}"))));
            }
        };

        let kinds = match self.supported_kinds().await {
            Ok(kinds) => kinds,
            Err(e) => {
                tracing::error!(error = %e, "facilitator capability discovery failed");
                return Err(Self::facilitator_unavailable());
            }
        };
        if !kinds.contains(&self.requirements.scheme, &self.requirements.network) {
            tracing::error!(
                scheme = %self.requirements.scheme,
                network = %self.requirements.network,
                "facilitator does not support the advertised scheme/network"
            );
            return Err(Self::facilitator_unavailable());
        }

        if payload.scheme != self.requirements.scheme
            || payload.network != self.requirements.network
        {
            return Err(self.payment_required(Some(format!(
                "payment scheme/network {}/{} does not match advertised requirements",
                payload.scheme, payload.network
            ))));
        }

        tracing::info!(
            payer = %payload.payload.authorization.from,
            network = %payload.network,
            "payment attempt"
        );

        match self.facilitator.verify(&payload, &self.requirements).await {
            Ok(result) if result.is_valid => Ok(AdmittedPayment { payload }),
            Ok(result) => {
                tracing::warn!(
                    reason = result.invalid_reason.as_deref().unwrap_or("unknown"),
                    "payment rejected by facilitator"
                );
                let reason = result
                    .invalid_reason
                    .unwrap_or_else(|| "payment verification failed".to_string());
                Err(self.payment_required(Some(reason)))
            }
            Err(e) => {
                tracing::error!(error = %e, "facilitator verify call failed");
                Err(Self::facilitator_unavailable())
            }
        }
    }

    /// Settle an admitted payment. Runs after the handler has produced its
    /// response; a settlement failure is logged and surfaced as `None` but
    /// never alters the already-computed response.
    pub async fn settle(&self, admitted: AdmittedPayment) -> Option<SettleResponse> {
        match self
            .facilitator
            .settle(&admitted.payload, &self.requirements)
            .await
        {
            Ok(result) if result.success => {
                tracing::info!(
                    transaction = result.transaction.as_deref().unwrap_or(""),
                    network = %result.network,
                    "payment settled"
                );
                Some(result)
            }
            Ok(result) => {
                tracing::error!(
                    reason = result.error_reason.as_deref().unwrap_or("unknown"),
                    "settlement failed after response was produced"
                );
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "facilitator settle call failed");
                None
            }
        }
    }
}
