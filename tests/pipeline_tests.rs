use std::time::Duration;

use mockito::Matcher;
use serde_json::json;

use date_planner_rs::{
    DatePlanner, Extractor, GatheredData, Intent, OpenAiClient, PlacesTool, Synthesizer,
    VenueRecord, WeatherRecord, WeatherTool,
};

fn llm_response(content: &str) -> String {
    json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}}
        ]
    })
    .to_string()
}

fn weather_body(temp: f64, condition: &str, humidity: u32) -> String {
    json!({
        "main": {"temp": temp, "humidity": humidity},
        "weather": [{"main": condition, "description": condition}]
    })
    .to_string()
}

fn stub_intent(city: &str, vibe: &str) -> Intent {
    Intent {
        city: city.to_string(),
        date_time: None,
        budget: Some(2000),
        vibe: vibe.to_string(),
        preferences: Vec::new(),
    }
}

fn stub_weather() -> WeatherRecord {
    WeatherRecord {
        temperature: 25.0,
        condition: "Clear".to_string(),
        humidity: 60,
        suitable_for_outdoor: true,
    }
}

fn stub_venue(name: &str) -> VenueRecord {
    VenueRecord {
        name: name.to_string(),
        category: "restaurant".to_string(),
        address: "12 MG Road, Bandra".to_string(),
        rating: Some(9.2),
        price_level: Some(3),
    }
}

#[tokio::test]
async fn test_weather_tool_maps_provider_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Mumbai,IN".into()),
            Matcher::UrlEncoded("appid".into(), "test-key".into()),
            Matcher::UrlEncoded("units".into(), "metric".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(weather_body(28.5, "Clouds", 70))
        .create_async()
        .await;

    let tool = WeatherTool::new("test-key").with_base_url(server.url());
    let record = tool.get_weather("Mumbai").await.unwrap();

    assert_eq!(record.temperature, 28.5);
    assert_eq!(record.condition, "Clouds");
    assert_eq!(record.humidity, 70);
    assert!(record.suitable_for_outdoor);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_weather_tool_classifies_rain_as_unsuitable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(weather_body(25.0, "Rain", 90))
        .create_async()
        .await;

    let tool = WeatherTool::new("test-key").with_base_url(server.url());
    let record = tool.get_weather("Mumbai").await.unwrap();

    assert!(!record.suitable_for_outdoor);
}

#[tokio::test]
async fn test_weather_tool_absorbs_provider_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let tool = WeatherTool::new("test-key").with_base_url(server.url());
    assert!(tool.get_weather("Mumbai").await.is_none());
}

#[tokio::test]
async fn test_places_tool_maps_results() {
    let body = json!({
        "results": [
            {
                "name": "Olive Bar & Kitchen",
                "categories": [{"name": "Mediterranean Restaurant"}],
                "location": {"address": "12 MG Road", "locality": "Bandra"},
                "rating": 9.2,
                "price": 3
            },
            {
                "name": "Hidden Gem",
                "categories": [],
                "location": {},
                "rating": null,
                "price": null
            }
        ]
    })
    .to_string();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("near".into(), "Mumbai,India".into()),
            Matcher::UrlEncoded("categories".into(), "13065".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
            Matcher::UrlEncoded("sort".into(), "RATING".into()),
        ]))
        .match_header("authorization", "fsq-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let tool = PlacesTool::new("fsq-key").with_base_url(server.url());
    let venues = tool.search_venues("Mumbai", "restaurant", 5).await;

    assert_eq!(venues.len(), 2);
    assert_eq!(venues[0].name, "Olive Bar & Kitchen");
    assert_eq!(venues[0].category, "Mediterranean Restaurant");
    assert_eq!(venues[0].address, "12 MG Road, Bandra");
    assert_eq!(venues[0].rating, Some(9.2));
    assert_eq!(venues[0].price_level, Some(3));

    // Provider omitted category and location fields
    assert_eq!(venues[1].category, "restaurant");
    assert_eq!(venues[1].address, "Address not available");
    assert_eq!(venues[1].rating, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_places_tool_absorbs_provider_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(r#"{"message": "invalid key"}"#)
        .create_async()
        .await;

    let tool = PlacesTool::new("fsq-key").with_base_url(server.url());
    assert!(tool.search_venues("Mumbai", "bar", 5).await.is_empty());
}

#[tokio::test]
async fn test_extraction_parses_structured_response() {
    let content = r#"{"city": "Bangalore", "date_time": null, "budget": 2000, "vibe": "fun", "preferences": ["live music"]}"#;
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(llm_response(content))
        .create_async()
        .await;

    let mut client = OpenAiClient::new("sk-test".to_string());
    client.set_base_url(server.url());

    let intent = Extractor::new(client)
        .extract("Suggest a fun date in Bangalore within ₹2000")
        .await;

    assert_eq!(intent.city, "Bangalore");
    assert_eq!(intent.budget, Some(2000));
    assert_eq!(intent.vibe, "fun");
    assert_eq!(intent.preferences, vec!["live music".to_string()]);
}

#[tokio::test]
async fn test_extraction_failure_yields_fallback_intent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body(r#"{"error": {"message": "upstream exploded"}}"#)
        .create_async()
        .await;

    let mut client = OpenAiClient::new("sk-test".to_string());
    client.set_base_url(server.url());

    let intent = Extractor::new(client)
        .extract("Plan a romantic dinner in Mumbai")
        .await;

    assert_eq!(intent.city, "Mumbai");
    assert_eq!(intent.vibe, "romantic");
    assert!(intent.date_time.is_none());
    assert!(intent.budget.is_none());
    assert!(intent.preferences.is_empty());
}

#[tokio::test]
async fn test_extraction_malformed_content_yields_fallback_intent() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(llm_response("Sure! Here's a lovely plan for you."))
        .create_async()
        .await;

    let mut client = OpenAiClient::new("sk-test".to_string());
    client.set_base_url(server.url());

    let intent = Extractor::new(client).extract("anything").await;
    assert_eq!(intent.city, "Mumbai");
    assert_eq!(intent.vibe, "romantic");
}

#[tokio::test]
async fn test_synthesis_normal_path_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(llm_response(
            "Begin with sunset drinks, then dinner at Olive Bar & Kitchen.",
        ))
        .create_async()
        .await;

    let mut client = OpenAiClient::new("sk-test".to_string());
    client.set_base_url(server.url());

    let venues = vec![stub_venue("Olive Bar & Kitchen"), stub_venue("The Table"), stub_venue("Masque")];
    let data = GatheredData {
        intent: stub_intent("Mumbai", "romantic"),
        weather: Some(stub_weather()),
        venues: venues.clone(),
        category: "restaurant".to_string(),
    };

    let plan = Synthesizer::new(client).synthesize(data).await;

    assert_eq!(plan.title, "Romantic Date in Mumbai");
    assert_eq!(plan.city, "Mumbai");
    assert_eq!(
        plan.itinerary,
        "Begin with sunset drinks, then dinner at Olive Bar & Kitchen."
    );
    assert_eq!(plan.recommendations.len(), 3);
    for (output, input) in plan.recommendations.iter().zip(&venues) {
        assert_eq!(output.name, input.name);
    }
    assert!(plan
        .tips
        .iter()
        .any(|tip| tip == "Book in advance for better seating"));
    assert_eq!(plan.budget_estimate, Some(2000));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_synthesis_non_romantic_vibe_has_no_booking_tip() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(llm_response("A playful evening of bar-hopping."))
        .create_async()
        .await;

    let mut client = OpenAiClient::new("sk-test".to_string());
    client.set_base_url(server.url());

    let data = GatheredData {
        intent: stub_intent("Mumbai", "fun"),
        weather: Some(stub_weather()),
        venues: vec![stub_venue("Bar One")],
        category: "bar".to_string(),
    };

    let plan = Synthesizer::new(client).synthesize(data).await;
    assert!(!plan
        .tips
        .iter()
        .any(|tip| tip == "Book in advance for better seating"));
}

#[tokio::test]
async fn test_synthesis_caps_five_venues_to_three() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(llm_response("An evening across the city's best spots."))
        .create_async()
        .await;

    let mut client = OpenAiClient::new("sk-test".to_string());
    client.set_base_url(server.url());

    let data = GatheredData {
        intent: stub_intent("Mumbai", "romantic"),
        weather: Some(stub_weather()),
        venues: (0..5).map(|i| stub_venue(&format!("Venue {i}"))).collect(),
        category: "restaurant".to_string(),
    };

    let plan = Synthesizer::new(client).synthesize(data).await;
    assert_eq!(plan.recommendations.len(), 3);
    assert_eq!(plan.recommendations[0].name, "Venue 0");
    assert_eq!(plan.recommendations[2].name, "Venue 2");
    assert!(plan.tips.len() <= 3);
}

#[tokio::test]
async fn test_synthesis_llm_failure_degrades_itinerary_only() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body(r#"{"error": {"message": "model overloaded"}}"#)
        .create_async()
        .await;

    let mut client = OpenAiClient::new("sk-test".to_string());
    client.set_base_url(server.url());

    let data = GatheredData {
        intent: stub_intent("Mumbai", "romantic"),
        weather: Some(stub_weather()),
        venues: vec![stub_venue("Olive Bar & Kitchen")],
        category: "restaurant".to_string(),
    };

    let plan = Synthesizer::new(client).synthesize(data).await;

    // Still the normal path: real title, templated itinerary
    assert_eq!(plan.title, "Romantic Date in Mumbai");
    assert_eq!(
        plan.itinerary,
        "Enjoy a romantic date at Olive Bar & Kitchen."
    );
}

#[tokio::test]
async fn test_full_pipeline_with_all_providers() {
    let mut llm_server = mockito::Server::new_async().await;
    // Extraction request carries the json_schema response format
    llm_server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("json_schema".to_string()))
        .with_status(200)
        .with_body(llm_response(
            r#"{"city": "Mumbai", "date_time": "Saturday", "budget": null, "vibe": "romantic", "preferences": []}"#,
        ))
        .create_async()
        .await;
    llm_server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("itinerary".to_string()))
        .with_status(200)
        .with_body(llm_response(
            "Start at Olive Bar & Kitchen, then stroll along the Bandstand promenade.",
        ))
        .create_async()
        .await;

    let mut weather_server = mockito::Server::new_async().await;
    weather_server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(weather_body(27.0, "Clear", 65))
        .create_async()
        .await;

    let mut places_server = mockito::Server::new_async().await;
    places_server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("categories".into(), "13065".into()))
        .with_status(200)
        .with_body(
            json!({
                "results": [
                    {
                        "name": "Olive Bar & Kitchen",
                        "categories": [{"name": "Mediterranean Restaurant"}],
                        "location": {"address": "14 Union Park", "locality": "Khar"},
                        "rating": 9.0,
                        "price": 3
                    }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let mut llm = OpenAiClient::new("sk-test".to_string());
    llm.set_base_url(llm_server.url());
    let weather = WeatherTool::new("owm-key").with_base_url(weather_server.url());
    let places = PlacesTool::new("fsq-key").with_base_url(places_server.url());

    let planner = DatePlanner::new(llm, weather, places);
    let plan = planner
        .plan("Plan a romantic dinner in Mumbai this Saturday")
        .await
        .unwrap();

    assert_eq!(plan.title, "Romantic Date in Mumbai");
    assert_eq!(plan.weather.temperature, 27.0);
    assert_eq!(plan.recommendations.len(), 1);
    assert_eq!(plan.recommendations[0].address, "14 Union Park, Khar");
    assert!(plan.itinerary.contains("Olive Bar & Kitchen"));
    assert_eq!(
        plan.tips,
        vec!["Book in advance for better seating".to_string()]
    );
}

#[tokio::test]
async fn test_pipeline_degrades_when_venues_are_empty() {
    let mut llm_server = mockito::Server::new_async().await;
    llm_server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("json_schema".to_string()))
        .with_status(200)
        .with_body(llm_response(
            r#"{"city": "Mumbai", "date_time": null, "budget": null, "vibe": "romantic", "preferences": []}"#,
        ))
        .create_async()
        .await;
    // No itinerary mock: the degraded path must not call the LLM again

    let mut weather_server = mockito::Server::new_async().await;
    weather_server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(weather_body(27.0, "Clear", 65))
        .create_async()
        .await;

    let mut places_server = mockito::Server::new_async().await;
    places_server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let mut llm = OpenAiClient::new("sk-test".to_string());
    llm.set_base_url(llm_server.url());
    let weather = WeatherTool::new("owm-key").with_base_url(weather_server.url());
    let places = PlacesTool::new("fsq-key").with_base_url(places_server.url());

    let planner = DatePlanner::new(llm, weather, places);
    let plan = planner.plan("Plan a romantic dinner in Mumbai").await.unwrap();

    assert_eq!(plan.title, "Date Plan for Mumbai");
    assert!(plan.itinerary.starts_with("Plan a romantic date in Mumbai"));
    assert!(plan.recommendations.is_empty());
    assert_eq!(
        plan.tips,
        vec!["API data unavailable - verify details locally".to_string()]
    );
}

#[tokio::test]
async fn test_deadline_expiry_surfaces_timeout() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(llm_response("{}"))
        .create_async()
        .await;

    let mut llm = OpenAiClient::new("sk-test".to_string());
    llm.set_base_url(server.url());
    let weather = WeatherTool::new("owm-key").with_base_url(server.url());
    let places = PlacesTool::new("fsq-key").with_base_url(server.url());

    let planner =
        DatePlanner::new(llm, weather, places).with_deadline(Duration::from_millis(0));

    let err = planner.plan("anything").await.unwrap_err();
    assert_eq!(err.error_code(), "TIMEOUT_ERROR");
}

#[test]
fn test_config_error_when_credentials_missing() {
    std::env::remove_var("WEATHER_API_KEY");
    let err = WeatherTool::from_env().unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.is_fatal());

    std::env::remove_var("FOURSQUARE_API_KEY");
    let err = PlacesTool::from_env().unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}
