use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("invalid model input: {0}")]
    InvalidInput(String),

    /// Fitting or prediction failed. Caught by the engine, never surfaced.
    #[error("model failure: {0}")]
    ModelFailure(String),
}

impl ForecastError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn model_failure(msg: impl Into<String>) -> Self {
        Self::ModelFailure(msg.into())
    }
}
