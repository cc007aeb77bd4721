//! date-planner-rs: a three-stage pipeline that turns free-text date
//! requests into structured plans
//!
//! One LLM call extracts a structured intent, weather and venue providers
//! supply contextual data, and a second LLM call composes the itinerary.
//! Every provider failure is absorbed at its stage boundary, so the
//! pipeline degrades to deterministic fallbacks instead of failing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use date_planner_rs::DatePlanner;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let planner = DatePlanner::from_env()?;
//!     let plan = planner.plan("Plan a romantic dinner in Mumbai").await?;
//!     println!("{}: {}", plan.title, plan.itinerary);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub mod services;
pub mod tools;
pub mod types;

pub use crate::core::{
    determine_category, fallback_intent, generate_tips, DatePlanner, Extractor, Gatherer,
    Synthesizer,
};
pub use error::{PlannerError, Result};
pub use services::{ChatCompletionRequest, OpenAiClient};
pub use tools::weather::is_outdoor_suitable;
pub use tools::{PlacesTool, WeatherTool};
pub use types::{DatePlan, GatheredData, Intent, VenueRecord, WeatherRecord};

#[cfg(feature = "cli")]
pub mod cli;
