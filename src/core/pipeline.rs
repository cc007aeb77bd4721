use std::time::Duration;

use tracing::info;

use crate::core::{Extractor, Gatherer, Synthesizer};
use crate::error::{PlannerError, Result};
use crate::services::OpenAiClient;
use crate::tools::{PlacesTool, WeatherTool};
use crate::types::DatePlan;

/// Pipeline orchestrator: extraction, data gathering, then synthesis.
///
/// Each stage absorbs its own provider failures, so a plan is produced on
/// a best-effort basis; only an expired deadline surfaces as an error.
#[derive(Debug)]
pub struct DatePlanner {
    extractor: Extractor,
    gatherer: Gatherer,
    synthesizer: Synthesizer,
    deadline: Option<Duration>,
}

impl DatePlanner {
    /// Build a planner from explicitly constructed provider clients.
    pub fn new(llm: OpenAiClient, weather: WeatherTool, places: PlacesTool) -> Self {
        Self {
            extractor: Extractor::new(llm.clone()),
            gatherer: Gatherer::new(weather, places),
            synthesizer: Synthesizer::new(llm),
            deadline: None,
        }
    }

    /// Build all provider clients from the environment. Fails fast when
    /// any of the three API credentials is missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            OpenAiClient::from_env()?,
            WeatherTool::from_env()?,
            PlacesTool::from_env()?,
        ))
    }

    /// Model used for both LLM call sites
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.extractor = self.extractor.with_model(model.clone());
        self.synthesizer = self.synthesizer.with_model(model);
        self
    }

    /// Per-request timeout for the LLM calls
    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.extractor = self.extractor.with_timeout(timeout);
        self.synthesizer = self.synthesizer.with_timeout(timeout);
        self
    }

    /// Overall deadline for a whole `plan` invocation. Off by default;
    /// expiry maps to [`PlannerError::Timeout`].
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Produce a plan for a free-text request.
    pub async fn plan(&self, prompt: &str) -> Result<DatePlan> {
        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(prompt))
                .await
                .map_err(|_| {
                    PlannerError::Timeout(format!(
                        "planning did not complete within {}s",
                        deadline.as_secs()
                    ))
                }),
            None => Ok(self.run(prompt).await),
        }
    }

    async fn run(&self, prompt: &str) -> DatePlan {
        let intent = self.extractor.extract(prompt).await;
        info!("Extracted intent: {} ({} vibe)", intent.city, intent.vibe);

        let data = self.gatherer.gather(intent).await;
        info!(
            "Gathered {} venues for category {}",
            data.venues.len(),
            data.category
        );

        self.synthesizer.synthesize(data).await
    }
}
