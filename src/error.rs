use thiserror::Error;

/// Main error type for the date-planning pipeline
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider call failed: {0}")]
    Provider(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Deadline exceeded: {0}")]
    Timeout(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Provider(_) => "PROVIDER_ERROR",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Timeout(_) => "TIMEOUT_ERROR",
            PlannerError::Pipeline(_) => "PIPELINE_ERROR",
        }
    }

    /// True for errors that are fatal at construction time rather than
    /// absorbed by a stage fallback.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PlannerError::Config(_))
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "fatal": self.is_fatal()
            }
        })
    }
}
