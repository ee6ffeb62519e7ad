pub mod ai_service;
pub mod estimator;
pub mod gemini; // Google Gemini generateContent client
pub mod image_check;
pub mod prompts;
pub mod reply_parser;

#[cfg(test)]
pub mod fake;

pub use ai_service::AIService;
pub use estimator::EstimationService;
pub use gemini::GeminiService;
