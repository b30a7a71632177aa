//! Weather provider contract and the mock dataset backing it.
//!
//! Lookup-key normalization lives here, not in the HTTP handler: matching
//! is case-insensitive, tolerates a trailing `", <region>"` suffix, and
//! strips one layer of wrapping single or double quotes.

use serde::{Deserialize, Serialize};

/// Plain weather value returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub city: String,
    pub condition: String,
    pub temperature_c: i32,
    pub humidity: u8,
}

/// Provider faults. The handler maps any fault to a generic 503 and never
/// leaks this error's text to the client.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Weather lookup capability, injected into the HTTP surface so tests can
/// swap in fakes.
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn lookup(&self, city: &str) -> Result<Option<WeatherRecord>, ProviderError>;
}

/// In-memory provider with a small fixed dataset.
pub struct MockWeatherProvider {
    records: Vec<WeatherRecord>,
}

impl MockWeatherProvider {
    pub fn new() -> Self {
        Self {
            records: vec![
                WeatherRecord {
                    city: "Tokyo".to_string(),
                    condition: "Sunny".to_string(),
                    temperature_c: 28,
                    humidity: 60,
                },
                WeatherRecord {
                    city: "Osaka".to_string(),
                    condition: "Cloudy".to_string(),
                    temperature_c: 26,
                    humidity: 65,
                },
                WeatherRecord {
                    city: "New York".to_string(),
                    condition: "Rainy".to_string(),
                    temperature_c: 22,
                    humidity: 72,
                },
            ],
        }
    }
}

impl Default for MockWeatherProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip one layer of matching single or double quotes.
fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if s.len() >= 2 {
        let (first, last) = (bytes[0], bytes[s.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn normalize_city(raw: &str) -> String {
    strip_quotes(raw.trim()).trim().to_lowercase()
}

#[async_trait::async_trait]
impl WeatherProvider for MockWeatherProvider {
    async fn lookup(&self, city: &str) -> Result<Option<WeatherRecord>, ProviderError> {
        let normalized = normalize_city(city);

        let find = |key: &str| {
            self.records
                .iter()
                .find(|r| normalize_city(&r.city) == key)
                .cloned()
        };

        if let Some(record) = find(&normalized) {
            return Ok(Some(record));
        }

        // "Tokyo, JP" should still match "Tokyo".
        if let Some((prefix, _region)) = normalized.split_once(',') {
            return Ok(find(prefix.trim()));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_city() {
        let provider = MockWeatherProvider::new();
        let record = provider.lookup("Tokyo").await.unwrap().unwrap();
        assert_eq!(record.city, "Tokyo");
        assert_eq!(record.condition, "Sunny");
        assert_eq!(record.temperature_c, 28);
        assert_eq!(record.humidity, 60);
    }

    #[tokio::test]
    async fn test_case_insensitive_match() {
        let provider = MockWeatherProvider::new();
        let upper = provider.lookup("TOKYO").await.unwrap();
        let lower = provider.lookup("tokyo").await.unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.unwrap().city, "Tokyo");
    }

    #[tokio::test]
    async fn test_region_suffix_tolerated() {
        let provider = MockWeatherProvider::new();
        let record = provider.lookup("Tokyo, JP").await.unwrap().unwrap();
        assert_eq!(record.city, "Tokyo");

        let record = provider.lookup("new york, US").await.unwrap().unwrap();
        assert_eq!(record.city, "New York");
    }

    #[tokio::test]
    async fn test_wrapping_quotes_stripped() {
        let provider = MockWeatherProvider::new();
        let single = provider.lookup("'Tokyo'").await.unwrap().unwrap();
        let double = provider.lookup("\"Tokyo\"").await.unwrap().unwrap();
        assert_eq!(single.city, "Tokyo");
        assert_eq!(double.city, "Tokyo");
    }

    #[tokio::test]
    async fn test_unknown_city_is_none() {
        let provider = MockWeatherProvider::new();
        assert!(provider.lookup("Atlantis").await.unwrap().is_none());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = WeatherRecord {
            city: "Tokyo".to_string(),
            condition: "Sunny".to_string(),
            temperature_c: 28,
            humidity: 60,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["temperatureC"], 28);
        assert_eq!(json["humidity"], 60);
    }
}
