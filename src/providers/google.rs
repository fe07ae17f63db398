use crate::config::{default_temperature, HostedConfig};
use crate::error::AnalysisError;
use crate::prompt::{Prompt, UserContent};
use crate::providers::http::{build_client, send_json};
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Hosted Gemini backend with native structured output
pub struct GoogleProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration
    pub fn new(
        config: &HostedConfig,
        temperature: f32,
        timeout: Option<Duration>,
    ) -> Result<Self, AnalysisError> {
        let api_key = config.resolve_api_key()?;

        Ok(GoogleProvider {
            client: build_client(timeout)?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        GoogleProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: default_temperature(),
        }
    }

    fn request_body(&self, prompt: &Prompt) -> Value {
        let parts = match &prompt.user {
            UserContent::Text(text) => json!([{ "text": text }]),
            UserContent::Multimodal { text, image } => json!([
                { "text": text },
                { "inlineData": { "mimeType": image.mime_type, "data": image.data } }
            ]),
        };

        let mut generation_config = json!({ "temperature": self.temperature });
        if prompt.json_only {
            generation_config["responseMimeType"] = json!("application/json");
            if let Some(schema) = &prompt.response_schema {
                generation_config["responseJsonSchema"] = schema.clone();
            }
        }

        json!({
            "contents": [{ "role": "user", "parts": parts }],
            "systemInstruction": { "parts": [{ "text": prompt.system }] },
            "generationConfig": generation_config
        })
    }
}

#[async_trait]
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, AnalysisError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("Sending generateContent request to {}", url);

        let response_body = send_json(
            self.client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&self.request_body(prompt)),
        )
        .await?;
        debug!("Google Gemini response: {:?}", response_body);

        response_text(&response_body).ok_or_else(|| {
            let reason = response_body["promptFeedback"]["blockReason"]
                .as_str()
                .or_else(|| response_body["candidates"][0]["finishReason"].as_str())
                .unwrap_or("no text in response");
            AnalysisError::Transport {
                status: Some(200),
                body: format!("Google Gemini returned no content ({})", reason),
            }
        })
    }
}

/// Concatenate the text parts of the first candidate
fn response_text(body: &Value) -> Option<String> {
    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!text.is_empty()).then_some(text)
}
