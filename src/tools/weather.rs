use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::error::{PlannerError, Result};
use crate::types::WeatherRecord;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenWeatherMap client. Lookups never fail the pipeline; a provider
/// failure maps to `None`.
#[derive(Debug, Clone)]
pub struct WeatherTool {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: WeatherMain,
    weather: Vec<WeatherCondition>,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    main: String,
}

impl WeatherTool {
    /// Create a new tool using the provided API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Build the tool using the `WEATHER_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("WEATHER_API_KEY")
            .map_err(|_| PlannerError::Config("Missing WEATHER_API_KEY env var".to_string()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch current weather for a city. Returns `None` on any provider
    /// failure (non-2xx, timeout, malformed body).
    pub async fn get_weather(&self, city: &str) -> Option<WeatherRecord> {
        match self.fetch(city).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Weather API error: {}", err);
                None
            }
        }
    }

    async fn fetch(&self, city: &str) -> Result<WeatherRecord> {
        let query = [
            ("q", format!("{city},IN")),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| PlannerError::Provider(format!("Weather request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(PlannerError::Provider(format!(
                "Weather provider returned status {}",
                response.status()
            )));
        }

        let data: WeatherResponse = response
            .json()
            .await
            .map_err(|err| PlannerError::Provider(format!("Malformed weather response: {err}")))?;

        let condition = data
            .weather
            .first()
            .map(|entry| entry.main.clone())
            .ok_or_else(|| {
                PlannerError::Provider("Weather response contained no condition".to_string())
            })?;

        let suitable = is_outdoor_suitable(data.main.temp, &condition);

        Ok(WeatherRecord {
            temperature: data.main.temp,
            condition,
            humidity: data.main.humidity,
            suitable_for_outdoor: suitable,
        })
    }
}

/// Classify whether the weather suits outdoor activities. Unsuitable when
/// the condition is rain, thunderstorm, or snow (case-insensitive), or the
/// temperature falls outside 10–40°C.
pub fn is_outdoor_suitable(temperature: f64, condition: &str) -> bool {
    if matches!(
        condition.to_lowercase().as_str(),
        "rain" | "thunderstorm" | "snow"
    ) {
        return false;
    }
    if temperature < 10.0 || temperature > 40.0 {
        return false;
    }
    true
}
