use crate::config::{default_temperature, CustomProvider};
use crate::error::{AnalysisError, ConnectionTestError};
use crate::prompt::{Prompt, UserContent};
use crate::providers::http::{build_client, send_json};
use crate::providers::LlmProvider;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Any OpenAI-compatible chat-completions endpoint (OpenAI, OpenRouter,
/// Ollama, LM Studio, vLLM, ...)
pub struct OpenAICompatibleProvider {
    client: Client,
    endpoint: CustomProvider,
    temperature: f32,
}

impl OpenAICompatibleProvider {
    /// Create a provider for a validated custom endpoint
    pub fn new(
        endpoint: &CustomProvider,
        temperature: f32,
        timeout: Option<Duration>,
    ) -> Result<Self, AnalysisError> {
        endpoint.validate()?;
        Ok(OpenAICompatibleProvider {
            client: build_client(timeout)?,
            endpoint: endpoint.clone(),
            temperature,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAICompatibleProvider {
            client: Client::new(),
            endpoint: CustomProvider::new(base_url, api_key, model),
            temperature: default_temperature(),
        }
    }

    fn messages(prompt: &Prompt) -> Value {
        let user = match &prompt.user {
            UserContent::Text(text) => json!(text),
            UserContent::Multimodal { text, image } => json!([
                { "type": "text", "text": text },
                { "type": "image_url", "image_url": { "url": image.to_data_url() } }
            ]),
        };
        json!([
            { "role": "system", "content": prompt.system },
            { "role": "user", "content": user }
        ])
    }

    fn request_body(&self, prompt: &Prompt) -> Value {
        let mut body = json!({
            "model": self.endpoint.model,
            "messages": Self::messages(prompt),
            "temperature": self.temperature
        });
        if prompt.json_only {
            // Only a hint: compatible servers may ignore it
            body["response_format"] = json!({ "type": "json_object" });
        }
        body
    }

    /// List the model ids the endpoint advertises.
    ///
    /// Failures other than the request itself being impossible are soft: the
    /// user can still type a model name, so an empty list is returned.
    pub async fn list_models(&self) -> Vec<String> {
        let url = self.endpoint.endpoint("models");
        debug!("Listing models from {}", url);

        let request = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.endpoint.api_key));

        match send_json(request).await {
            Ok(body) => {
                let models = model_ids(&body);
                if models.is_empty() {
                    warn!("Model listing from {} contained no model ids", url);
                }
                models
            }
            Err(e) => {
                warn!("Failed to list models from {}: {}", url, e);
                Vec::new()
            }
        }
    }

    /// Send a minimal completion to check URL, key and model
    pub async fn test_connection(&self) -> Result<(), ConnectionTestError> {
        let url = self.endpoint.endpoint("chat/completions");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.endpoint.api_key))
            .json(&json!({
                "model": self.endpoint.model,
                "messages": [{ "role": "user", "content": "ping" }],
                "max_tokens": 5
            }))
            .send()
            .await
            .map_err(|e| ConnectionTestError::Connection {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            info!("Connection test to {} succeeded", url);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Connection test to {} failed with {}", url, status);
        Err(ConnectionTestError::from_status(status.as_u16(), body))
    }
}

#[async_trait]
impl LlmProvider for OpenAICompatibleProvider {
    fn provider_name(&self) -> &str {
        "openai_compatible"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, AnalysisError> {
        let url = self.endpoint.endpoint("chat/completions");
        debug!("Sending chat completion request to {}", url);

        let response_body = send_json(
            self.client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.endpoint.api_key))
                .json(&self.request_body(prompt)),
        )
        .await?;
        debug!("Chat completion response: {:?}", response_body);

        message_content(&response_body["choices"][0]["message"]["content"]).ok_or_else(|| {
            AnalysisError::Transport {
                status: Some(200),
                body: format!(
                    "Failed to extract content from chat completion response: {}",
                    response_body
                ),
            }
        })
    }
}

/// Message content is a string, or an array of typed parts on some servers
fn message_content(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let text: String = parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

/// Accepts `{"data": [...]}`, `{"models": [...]}` or a bare array whose items
/// are `{"id"}`, `{"name"}` or plain strings
fn model_ids(body: &Value) -> Vec<String> {
    let items = body
        .get("data")
        .or_else(|| body.get("models"))
        .unwrap_or(body)
        .as_array();

    let mut ids: Vec<String> = items
        .into_iter()
        .flatten()
        .filter_map(|item| {
            item.as_str()
                .or_else(|| item["id"].as_str())
                .or_else(|| item["name"].as_str())
        })
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}
