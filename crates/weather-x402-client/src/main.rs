use x402::EnvSource;
use x402_client::WeatherClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let city = std::env::args().nth(1).unwrap_or_else(|| "Tokyo".to_string());

    let client = match WeatherClient::from_source(&EnvSource) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "client configuration is incomplete");
            std::process::exit(1);
        }
    };

    match client.fetch_weather(&city).await {
        Ok(record) => {
            println!(
                "{}: {}, {}°C, {}% humidity",
                record.city, record.condition, record.temperature_c, record.humidity
            );
        }
        Err(e) => {
            tracing::error!(error = %e, city, "weather fetch failed");
            std::process::exit(1);
        }
    }
}
