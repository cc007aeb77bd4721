//! Clients for the external data providers consumed by the pipeline

pub mod places;
pub mod weather;

pub use places::PlacesTool;
pub use weather::WeatherTool;
