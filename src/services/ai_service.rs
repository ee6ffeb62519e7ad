use crate::error::EstimateError;

/// Raw image attached to a prompt.
#[derive(Debug, Clone, Copy)]
pub struct ImagePart<'a> {
    pub mime_type: &'a str,
    pub bytes: &'a [u8],
}

/// Trait for AI services (Gemini, test fakes, etc.)
///
/// Implementations return the model's raw text reply. They must not try to
/// interpret it; that is the reply parser's job.
#[async_trait::async_trait]
pub trait AIService: Send + Sync {
    async fn generate(&self, prompt: &str, image: Option<ImagePart<'_>>) -> Result<String, EstimateError>;
    fn model_name(&self) -> &str;
}
