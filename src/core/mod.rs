//! The three pipeline stages and the orchestrator that sequences them

pub mod extract;
pub mod gather;
pub mod pipeline;
pub mod synthesize;

pub use extract::{fallback_intent, Extractor};
pub use gather::{determine_category, Gatherer};
pub use pipeline::DatePlanner;
pub use synthesize::{generate_tips, Synthesizer};
