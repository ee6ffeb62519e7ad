//! Fake AI service for tests: canned reply, no network.

use std::sync::Mutex;

use super::ai_service::{AIService, ImagePart};
use crate::error::EstimateError;

/// A valid 1x1 RGB PNG.
pub const TINY_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x02\x00\x00\x00\x90\x77\x53\xde\x00\x00\x00\x0cIDAT\x78\x9c\x63\xf8\xcf\xc0\x00\x00\x03\x01\x01\x00\xc9\xfe\x92\xef\x00\x00\x00\x00IEND\xae\x42\x60\x82";

#[derive(Debug, Clone)]
pub enum FakeReply {
    Text(String),
    Upstream(String),
    Unauthorized(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub image_mime_type: Option<String>,
    pub image_len: Option<usize>,
}

#[derive(Debug)]
pub struct FakeAIService {
    reply: FakeReply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeAIService {
    pub fn replying(text: &str) -> Self {
        Self::new(FakeReply::Text(text.to_string()))
    }

    pub fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AIService for FakeAIService {
    async fn generate(&self, prompt: &str, image: Option<ImagePart<'_>>) -> Result<String, EstimateError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            image_mime_type: image.map(|i| i.mime_type.to_string()),
            image_len: image.map(|i| i.bytes.len()),
        });

        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Upstream(msg) => Err(EstimateError::Upstream(msg.clone())),
            FakeReply::Unauthorized(msg) => Err(EstimateError::NotConfigured(msg.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
