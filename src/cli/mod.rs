use clap::{Arg, ArgAction, Command};
use std::env;
use std::time::Duration;
use tracing::{error, info};

use crate::{DatePlan, DatePlanner, OpenAiClient, PlacesTool, WeatherTool};

/// CLI entry point for the date-planner tool
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("date-planner")
        .version("0.1.0")
        .about("Turn a free-text date request into a structured plan")
        .arg(
            Arg::new("prompt")
                .help("The date planning request, e.g. \"Plan a romantic dinner in Mumbai\"")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("The OpenAI model to use")
                .default_value("gpt-4o-mini"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("OpenAI API key (or set OPENAI_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("OpenAI-compatible base URL (or set OPENAI_BASE_URL env var)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("LLM request timeout in seconds")
                .default_value("120"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the plan as JSON instead of formatted text")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Get API key from argument or environment
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .ok_or("OpenAI API key is required. Set OPENAI_API_KEY environment variable or use --api-key")?;

    let mut llm = OpenAiClient::new(api_key);
    if let Some(base_url) = matches
        .get_one::<String>("base-url")
        .cloned()
        .or_else(|| env::var("OPENAI_BASE_URL").ok())
    {
        llm.set_base_url(base_url);
    }

    let weather = WeatherTool::from_env()?;
    let places = PlacesTool::from_env()?;

    let timeout_seconds: u64 = matches.get_one::<String>("timeout").unwrap().parse()?;
    let model = matches.get_one::<String>("model").unwrap();

    let planner = DatePlanner::new(llm, weather, places)
        .with_model(model.as_str())
        .with_llm_timeout(Duration::from_secs(timeout_seconds));

    let prompt = matches.get_one::<String>("prompt").unwrap();
    info!("Planning with prompt: {}", prompt);
    info!("Using model: {}", model);

    match planner.plan(prompt).await {
        Ok(plan) => {
            if matches.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
            info!("Plan generated successfully");
        }
        Err(e) => {
            error!("Planning failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

fn print_plan(plan: &DatePlan) {
    println!("\n{}", plan.title);
    println!("{}", "=".repeat(50));
    println!("\nCity: {}", plan.city);
    println!(
        "Weather: {}°C, {} ({}% humidity)",
        plan.weather.temperature, plan.weather.condition, plan.weather.humidity
    );

    if !plan.recommendations.is_empty() {
        println!("\nTop recommendations:");
        for (index, venue) in plan.recommendations.iter().enumerate() {
            println!("  {}. {} ({})", index + 1, venue.name, venue.category);
            println!("     {}", venue.address);
            if let Some(rating) = venue.rating {
                println!("     Rated {}/10", rating);
            }
        }
    }

    println!("\nItinerary:\n  {}", plan.itinerary);

    if let Some(budget) = plan.budget_estimate {
        println!("\nBudget: ₹{}", budget);
    }

    if !plan.tips.is_empty() {
        println!("\nTips:");
        for tip in &plan.tips {
            println!("  - {}", tip);
        }
    }
    println!();
}
