//! HTTP surface: an ungated health check and the payment-gated weather route.

use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{get, web, HttpRequest, HttpResponse};
use base64::Engine;
use serde::{Deserialize, Serialize};

use std::sync::Arc;

use crate::gate::PaymentGate;
use crate::provider::WeatherProvider;

/// Shared per-server state. The gate is optional so the weather handler
/// can be exercised without payment (tests, local development).
pub struct AppState {
    pub gate: Option<Arc<PaymentGate>>,
    pub provider: Arc<dyn WeatherProvider>,
}

/// Generic error body: `{"statusCode": ..., "message": ...}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}

impl ErrorBody {
    fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            message: message.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct WeatherQuery {
    city: Option<String>,
}

/// Health check. Never payment-gated; must stay reachable even with the
/// facilitator down.
#[get("/")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// The protected business logic, separated from the gate so its status
/// mapping is testable on its own.
async fn weather_response(provider: &dyn WeatherProvider, city: Option<&str>) -> HttpResponse {
    let city = city.map(str::trim).unwrap_or_default();
    if city.is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorBody::new(400, "city query parameter is required"));
    }

    match provider.lookup(city).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(ErrorBody::new(404, "city not found")),
        Err(e) => {
            // Provider-internal detail stays in the log, not the response.
            tracing::error!(error = %e, "weather provider failed");
            HttpResponse::ServiceUnavailable()
                .json(ErrorBody::new(503, "weather service unavailable"))
        }
    }
}

#[get("/weather")]
async fn weather(
    req: HttpRequest,
    query: web::Query<WeatherQuery>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let admitted = match &state.gate {
        Some(gate) => match gate.admit(&req).await {
            Ok(admitted) => Some((gate, admitted)),
            Err(response) => return response,
        },
        None => None,
    };

    let mut response = weather_response(state.provider.as_ref(), query.city.as_deref()).await;

    // Settlement follows the handler unconditionally for admitted requests;
    // its outcome never rewrites the response already computed above.
    if let Some((gate, admitted)) = admitted {
        if let Some(settlement) = gate.settle(admitted).await {
            if let Ok(json) = serde_json::to_vec(&settlement) {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&json);
                if let Ok(value) = HeaderValue::from_str(&encoded) {
                    response.headers_mut().insert(
                        HeaderName::from_static("x-payment-response"),
                        value,
                    );
                }
            }
        }
    }

    response
}

/// Register all routes on a service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(weather);
}
