use serde::{Deserialize, Serialize};

/// What the caller wants estimated. Exactly one form per call.
#[derive(Debug, Clone)]
pub enum EstimationRequest {
    Dish(String),
    Image { bytes: Vec<u8>, mime_type: String },
}

impl EstimationRequest {
    /// Dish name used when the model reply does not name one.
    pub fn fallback_dish(&self) -> &str {
        match self {
            EstimationRequest::Dish(name) => name,
            EstimationRequest::Image { .. } => "Uploaded Dish",
        }
    }
}

impl std::fmt::Display for EstimationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimationRequest::Dish(name) => write!(f, "dish '{}'", name),
            EstimationRequest::Image { bytes, mime_type } => {
                write!(f, "image ({}, {} bytes)", mime_type, bytes.len())
            }
        }
    }
}

/// Body of `POST /estimate`.
#[derive(Debug, Clone, Deserialize)]
pub struct EstimateIn {
    pub dish: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEstimate {
    pub name: String,
    pub carbon_kg: Option<f64>, // kg CO2e, None = unknown
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub dish: String,
    pub estimated_carbon_kg: Option<f64>, // None = unknown, never 0 by default
    pub ingredients: Vec<IngredientEstimate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model: String,
    pub configured: bool,
}
