use std::time::Duration;

use serde_json::json;
use tracing::warn;

use crate::error::Result;
use crate::services::{completion_text, ChatCompletionRequest, OpenAiClient};
use crate::types::{DatePlan, GatheredData, Intent, VenueRecord, WeatherRecord};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const ITINERARY_MAX_TOKENS: u32 = 200;

/// Recommendation and tip caps enforced on every produced plan
const MAX_RECOMMENDATIONS: usize = 3;
const MAX_TIPS: usize = 3;

/// Synthesis stage: composes the final plan. Uses the LLM only when both
/// weather and venues are available; otherwise produces a deterministic
/// fallback plan.
#[derive(Debug)]
pub struct Synthesizer {
    client: OpenAiClient,
    model: String,
    timeout: Duration,
}

impl Synthesizer {
    pub fn new(client: OpenAiClient) -> Self {
        Self {
            client,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn synthesize(&self, data: GatheredData) -> DatePlan {
        let weather = match &data.weather {
            Some(weather) if !data.venues.is_empty() => weather.clone(),
            _ => return fallback_plan(data),
        };

        let itinerary = self
            .generate_itinerary(&data.intent, &weather, &data.venues)
            .await;
        let tips = generate_tips(&weather, &data.intent.vibe);

        let mut recommendations = data.venues;
        recommendations.truncate(MAX_RECOMMENDATIONS);

        DatePlan {
            title: format!(
                "{} Date in {}",
                titlecase(&data.intent.vibe),
                data.intent.city
            ),
            city: data.intent.city,
            weather,
            recommendations,
            itinerary,
            budget_estimate: data.intent.budget,
            tips,
        }
    }

    async fn generate_itinerary(
        &self,
        intent: &Intent,
        weather: &WeatherRecord,
        venues: &[VenueRecord],
    ) -> String {
        match self.request_itinerary(intent, weather, venues).await {
            Ok(itinerary) => itinerary,
            Err(err) => {
                warn!("Itinerary generation error: {}", err);
                let venue = venues
                    .first()
                    .map(|venue| venue.name.as_str())
                    .unwrap_or("a local venue");
                format!("Enjoy a {} date at {}.", intent.vibe, venue)
            }
        }
    }

    async fn request_itinerary(
        &self,
        intent: &Intent,
        weather: &WeatherRecord,
        venues: &[VenueRecord],
    ) -> Result<String> {
        let venue_list = venues
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|venue| format!("- {} ({}): {}", venue.name, venue.category, venue.address))
            .collect::<Vec<_>>()
            .join("\n");

        let budget = intent
            .budget
            .map(|amount| amount.to_string())
            .unwrap_or_else(|| "flexible".to_string());

        let prompt = format!(
            "Create a date itinerary for {}.\nVibe: {}\nWeather: {}°C, {}\nBudget: {}\n\nTop venues:\n{}\n\nWrite a brief, engaging 3-4 sentence itinerary.",
            intent.city, intent.vibe, weather.temperature, weather.condition, budget, venue_list
        );

        let body = ChatCompletionRequest::new(
            &self.model,
            vec![json!({"role": "user", "content": prompt})],
        )
        .with_max_tokens(Some(ITINERARY_MAX_TOKENS))
        .into_value();

        let response = self.client.chat_completion(&body, self.timeout).await?;
        completion_text(&response)
    }
}

/// Deterministic plan used when weather or venue data is missing.
/// Performs no LLM call.
fn fallback_plan(data: GatheredData) -> DatePlan {
    let weather = data.weather.unwrap_or(WeatherRecord {
        temperature: 25.0,
        condition: "Clear".to_string(),
        humidity: 60,
        suitable_for_outdoor: true,
    });

    let mut recommendations = data.venues;
    recommendations.truncate(MAX_RECOMMENDATIONS);

    DatePlan {
        title: format!("Date Plan for {}", data.intent.city),
        itinerary: format!(
            "Plan a {} date in {}. Check local venues.",
            data.intent.vibe, data.intent.city
        ),
        city: data.intent.city,
        weather,
        recommendations,
        budget_estimate: data.intent.budget,
        tips: vec!["API data unavailable - verify details locally".to_string()],
    }
}

/// Contextual tips derived from weather and vibe, in a fixed order,
/// capped at three.
pub fn generate_tips(weather: &WeatherRecord, vibe: &str) -> Vec<String> {
    let mut tips = Vec::new();

    if !weather.suitable_for_outdoor {
        tips.push(format!(
            "Weather is {} - choose indoor venues",
            weather.condition.to_lowercase()
        ));
    }

    if weather.temperature > 30.0 {
        tips.push("It's warm - stay hydrated and choose AC venues".to_string());
    } else if weather.temperature < 20.0 {
        tips.push("Pleasant weather - perfect for outdoor settings".to_string());
    }

    if vibe == "romantic" {
        tips.push("Book in advance for better seating".to_string());
    }

    tips.truncate(MAX_TIPS);
    tips
}

fn titlecase(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
