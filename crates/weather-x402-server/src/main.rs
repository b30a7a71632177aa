use actix_web::{web, App, HttpServer};

use std::sync::Arc;

use x402::EnvSource;
use x402_server::config::{resolve_payment_options, PaymentOptions};
use x402_server::gate::PaymentGate;
use x402_server::provider::MockWeatherProvider;
use x402_server::routes::{self, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let options = match resolve_payment_options(PaymentOptions::default(), &EnvSource) {
        Ok(options) => options,
        Err(e) => {
            tracing::error!(error = %e, "payment configuration is incomplete");
            std::process::exit(1);
        }
    };

    let gate = match PaymentGate::new(&options) {
        Ok(gate) => Arc::new(gate),
        Err(e) => {
            tracing::error!(error = %e, "failed to build payment gate");
            std::process::exit(1);
        }
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8787);

    let state = web::Data::new(AppState {
        gate: Some(gate),
        provider: Arc::new(MockWeatherProvider::new()),
    });

    tracing::info!(
        pay_to = %options.pay_to,
        network = %options.network,
        price = %options.price,
        facilitator = %options.facilitator_url,
        "weather-x402-server listening at http://localhost:{port}"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(65_536))
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
