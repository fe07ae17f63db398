mod factory;
mod google;
mod http;
mod open_ai;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAICompatibleProvider;

use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::prompt::Prompt;

/// Unified trait for all LLM backends.
///
/// One call to [`complete`](LlmProvider::complete) sends exactly one request
/// and returns the model's raw text. Retrying is left to the caller.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai_compatible")
    fn provider_name(&self) -> &str;

    /// Submit the prompt and return the untrusted response text
    async fn complete(&self, prompt: &Prompt) -> Result<String, AnalysisError>;
}
