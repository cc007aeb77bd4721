use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::error::{PlannerError, Result};
use crate::types::VenueRecord;

const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v3/places/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Foursquare Places client. Searches never fail the pipeline; a provider
/// failure maps to an empty result list.
#[derive(Debug, Clone)]
pub struct PlacesTool {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    #[serde(default)]
    categories: Vec<PlaceCategory>,
    #[serde(default)]
    location: PlaceLocation,
    rating: Option<f64>,
    price: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PlaceCategory {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceLocation {
    address: Option<String>,
    locality: Option<String>,
}

impl PlacesTool {
    /// Create a new tool using the provided API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Build the tool using the `FOURSQUARE_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("FOURSQUARE_API_KEY")
            .map_err(|_| PlannerError::Config("Missing FOURSQUARE_API_KEY env var".to_string()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Search venues in a city, sorted by provider rating and capped at
    /// `limit`. Returns an empty list on any provider failure.
    pub async fn search_venues(&self, city: &str, category: &str, limit: u32) -> Vec<VenueRecord> {
        match self.fetch(city, category, limit).await {
            Ok(venues) => venues,
            Err(err) => {
                warn!("Places API error: {}", err);
                Vec::new()
            }
        }
    }

    async fn fetch(&self, city: &str, category: &str, limit: u32) -> Result<Vec<VenueRecord>> {
        let query = [
            ("near", format!("{city},India")),
            ("categories", map_category(category).to_string()),
            ("limit", limit.to_string()),
            ("sort", "RATING".to_string()),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .header("Authorization", &self.api_key)
            .header("Accept", "application/json")
            .query(&query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|err| PlannerError::Provider(format!("Places request failed: {err}")))?;

        if !response.status().is_success() {
            return Err(PlannerError::Provider(format!(
                "Places provider returned status {}",
                response.status()
            )));
        }

        let data: PlacesResponse = response
            .json()
            .await
            .map_err(|err| PlannerError::Provider(format!("Malformed places response: {err}")))?;

        let venues = data
            .results
            .into_iter()
            .map(|result| VenueRecord {
                name: result.name,
                category: result
                    .categories
                    .into_iter()
                    .next()
                    .map(|entry| entry.name)
                    .unwrap_or_else(|| category.to_string()),
                address: format_address(&result.location),
                rating: result.rating,
                price_level: result.price,
            })
            .collect();

        Ok(venues)
    }
}

/// Map a general category to its Foursquare category id. Unknown categories
/// fall back to the restaurant id.
pub fn map_category(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "restaurant" => "13065",
        "cafe" => "13034",
        "bar" => "13003",
        "attraction" => "16000",
        "park" => "16032",
        _ => "13065",
    }
}

fn format_address(location: &PlaceLocation) -> String {
    let parts: Vec<&str> = [location.address.as_deref(), location.locality.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    if parts.is_empty() {
        "Address not available".to_string()
    } else {
        parts.join(", ")
    }
}
