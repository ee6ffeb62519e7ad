use anyhow::Result;
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ai_service::{AIService, ImagePart};
use crate::error::EstimateError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

pub struct GeminiService {
    api_key: String,
    model: String,
    api_base: String,
    client: reqwest::Client,
}

impl GeminiService {
    pub fn new(api_key: String, model: String, api_base: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            api_key,
            model,
            api_base,
            client: builder.build()?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

fn build_request(prompt: &str, image: Option<ImagePart<'_>>) -> GenerateRequest {
    let mut parts = vec![Part::Text {
        text: prompt.to_string(),
    }];

    if let Some(image) = image {
        let data = general_purpose::STANDARD.encode(image.bytes);
        log::debug!("📊 Image size: {} bytes, base64: {} bytes", image.bytes.len(), data.len());
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: image.mime_type.to_string(),
                data,
            },
        });
    }

    GenerateRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
        },
    }
}

/// Concatenated text of the first candidate. A reply without candidates means
/// the prompt was blocked.
fn extract_text(response: GenerateResponse) -> Result<String, EstimateError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(EstimateError::Upstream(format!("Gemini returned no answer: {}", reason)));
    };

    if candidate.content.is_none() {
        log::warn!("⚠️ Gemini candidate has no content (finish reason: {:?})", candidate.finish_reason);
    }

    Ok(candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default())
}

/// Auth failures are configuration errors, everything else is upstream.
fn classify_error(status: u16, body: &str) -> EstimateError {
    let bad_key = status == 401
        || status == 403
        || (status == 400 && (body.contains("API_KEY_INVALID") || body.contains("API key not valid")));

    if bad_key {
        EstimateError::NotConfigured(format!("Gemini rejected the API key ({}): {}", status, body))
    } else {
        EstimateError::Upstream(format!("Gemini API error ({}): {}", status, body))
    }
}

#[async_trait::async_trait]
impl AIService for GeminiService {
    async fn generate(&self, prompt: &str, image: Option<ImagePart<'_>>) -> Result<String, EstimateError> {
        let request = build_request(prompt, image);

        log::info!("🤖 Sending request to Gemini with model: {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log::debug!("📥 Gemini response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            log::error!("❌ Gemini API error response ({}): {}", status, body);
            return Err(classify_error(status.as_u16(), &body));
        }

        log::debug!("📄 Raw Gemini response size: {} bytes", body.len());
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| EstimateError::Upstream(format!("Unreadable Gemini response: {}", e)))?;

        let text = extract_text(parsed)?;
        log::debug!("💬 Gemini response: {} bytes of text", text.len());
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
