use thiserror::Error;

/// Failures that cross the service boundary. Parse shortfalls never end up here.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("Gemini client not configured: {0}")]
    NotConfigured(String),

    #[error("Model error: {0}")]
    Upstream(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),
}

impl EstimateError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, EstimateError::NotConfigured(_))
    }
}

impl From<reqwest::Error> for EstimateError {
    fn from(e: reqwest::Error) -> Self {
        EstimateError::Upstream(e.to_string())
    }
}
