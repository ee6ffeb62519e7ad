use serde_json::{Map, Value};
use std::sync::Arc;

use super::ai_service::{AIService, ImagePart};
use super::image_check::detect_image_mime;
use super::prompts::build_instruction;
use super::reply_parser::parse_reply;
use crate::error::EstimateError;
use crate::models::{EstimationRequest, EstimationResult, IngredientEstimate};

/// Carbon estimation on top of a model client that is built once at startup
/// and only read afterwards. `None` means the credential was missing.
pub struct EstimationService {
    ai: Option<Arc<dyn AIService>>,
    model_name: String,
}

impl EstimationService {
    pub fn new(ai: Option<Arc<dyn AIService>>, model_name: String) -> Self {
        Self { ai, model_name }
    }

    pub fn is_configured(&self) -> bool {
        self.ai.is_some()
    }

    /// The live client's model, or the configured name when there is none.
    pub fn model_name(&self) -> &str {
        match &self.ai {
            Some(ai) => ai.model_name(),
            None => &self.model_name,
        }
    }

    pub async fn estimate_dish(&self, dish: &str) -> Result<EstimationResult, EstimateError> {
        let dish = dish.trim();
        if dish.is_empty() {
            return Err(EstimateError::InvalidInput("'dish' must be a non-empty string".to_string()));
        }
        self.estimate(EstimationRequest::Dish(dish.to_string())).await
    }

    pub async fn estimate_image(
        &self,
        bytes: Vec<u8>,
        declared_mime: Option<&str>,
    ) -> Result<EstimationResult, EstimateError> {
        if bytes.is_empty() {
            return Err(EstimateError::InvalidInput("Empty image upload".to_string()));
        }
        let mime_type = detect_image_mime(&bytes, declared_mime)?.to_string();
        self.estimate(EstimationRequest::Image { bytes, mime_type }).await
    }

    pub async fn estimate(&self, request: EstimationRequest) -> Result<EstimationResult, EstimateError> {
        log::info!("🍽️ Estimating carbon footprint for {}", request);

        let ai = self.ai.as_ref().ok_or_else(|| {
            EstimateError::NotConfigured("Ensure GEMINI_API_KEY is set".to_string())
        })?;

        let prompt = build_instruction(&request);
        let image = match &request {
            EstimationRequest::Image { bytes, mime_type } => Some(ImagePart {
                mime_type,
                bytes,
            }),
            EstimationRequest::Dish(_) => None,
        };

        let reply = ai.generate(&prompt, image).await?;
        log::debug!("📄 Model reply: {}", reply);

        let parsed = parse_reply(&reply);
        let result = assemble(&parsed, request.fallback_dish());

        log::info!(
            "✅ {}: {:?} kg CO2e over {} ingredients",
            result.dish,
            result.estimated_carbon_kg,
            result.ingredients.len()
        );
        Ok(result)
    }
}

/// Map a parsed reply onto the response shape. Missing numbers stay unknown,
/// they are never defaulted to zero.
pub fn assemble(parsed: &Map<String, Value>, fallback_dish: &str) -> EstimationResult {
    let ingredients: Vec<IngredientEstimate> = parsed
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|item| IngredientEstimate {
                    name: text_field(item.get("name")).unwrap_or_else(|| "Unknown".to_string()),
                    carbon_kg: item.get("carbon_kg").and_then(carbon_value),
                })
                .collect()
        })
        .unwrap_or_default();

    let total = match parsed.get("estimated_carbon_kg").and_then(carbon_value) {
        Some(total) => Some(total),
        None if !ingredients.is_empty() => ingredients
            .iter()
            .map(|i| i.carbon_kg)
            .sum::<Option<f64>>(),
        None => None,
    };

    EstimationResult {
        dish: text_field(parsed.get("dish")).unwrap_or_else(|| fallback_dish.to_string()),
        estimated_carbon_kg: total.map(round2),
        ingredients,
    }
}

fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Non-negative finite number, also accepted as a numeric string.
fn carbon_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
