use tracing::debug;

use crate::tools::{PlacesTool, WeatherTool};
use crate::types::{GatheredData, Intent, WeatherRecord};

/// Venues requested from the place-search provider per plan
const VENUE_LIMIT: u32 = 5;

/// Data-gathering stage: fetches weather and venues for an intent.
/// No LLM involved; sub-call failures surface as absent/empty data.
#[derive(Debug)]
pub struct Gatherer {
    weather: WeatherTool,
    places: PlacesTool,
}

impl Gatherer {
    pub fn new(weather: WeatherTool, places: PlacesTool) -> Self {
        Self { weather, places }
    }

    pub async fn gather(&self, intent: Intent) -> GatheredData {
        let weather = self.weather.get_weather(&intent.city).await;
        let category = determine_category(&intent.vibe, weather.as_ref());
        debug!("Derived category {} for vibe {}", category, intent.vibe);

        let venues = self
            .places
            .search_venues(&intent.city, &category, VENUE_LIMIT)
            .await;

        GatheredData {
            intent,
            weather,
            venues,
            category,
        }
    }
}

/// Derive the venue category from vibe and weather. Unsuitable outdoor
/// weather forces "cafe" regardless of vibe; otherwise the vibe maps
/// through a fixed table with "restaurant" as the default.
pub fn determine_category(vibe: &str, weather: Option<&WeatherRecord>) -> String {
    if let Some(weather) = weather {
        if !weather.suitable_for_outdoor {
            return "cafe".to_string();
        }
    }

    let category = match vibe.to_lowercase().as_str() {
        "romantic" => "restaurant",
        "fun" => "bar",
        "adventure" => "attraction",
        "cozy" => "cafe",
        _ => "restaurant",
    };
    category.to_string()
}
