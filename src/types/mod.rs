use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structured interpretation of a free-text date-planning request.
///
/// Produced once by the extraction stage and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Intent {
    /// Target city for the date
    pub city: String,
    /// Preferred date/time, verbatim from the request when mentioned
    pub date_time: Option<String>,
    /// Budget in INR when mentioned
    pub budget: Option<u32>,
    /// Desired atmosphere: romantic, fun, adventure, cozy (free-form)
    pub vibe: String,
    /// Additional preferences in the order they were stated
    #[serde(default)]
    pub preferences: Vec<String>,
}

/// Normalized weather information for a city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Primary condition label as reported by the provider (e.g. "Clear")
    pub condition: String,
    /// Humidity percentage
    pub humidity: u32,
    /// Whether the weather suits outdoor activities
    pub suitable_for_outdoor: bool,
}

/// A venue returned by the place-search provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueRecord {
    pub name: String,
    pub category: String,
    pub address: String,
    pub rating: Option<f64>,
    pub price_level: Option<u32>,
}

/// Bundle produced by the data-gathering stage and consumed by synthesis.
#[derive(Debug, Clone)]
pub struct GatheredData {
    pub intent: Intent,
    /// Absent when the weather lookup failed
    pub weather: Option<WeatherRecord>,
    /// Ordered by provider rating; may be empty
    pub venues: Vec<VenueRecord>,
    /// Venue category derived from vibe and weather
    pub category: String,
}

/// Final date plan returned by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatePlan {
    /// Plan title
    pub title: String,
    pub city: String,
    /// Always present; the degraded path synthesizes a neutral record
    /// when the lookup failed
    pub weather: WeatherRecord,
    /// Recommended venues, at most 3
    pub recommendations: Vec<VenueRecord>,
    /// Short narrative itinerary
    pub itinerary: String,
    pub budget_estimate: Option<u32>,
    /// Contextual tips, at most 3
    #[serde(default)]
    pub tips: Vec<String>,
}
