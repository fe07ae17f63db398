use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Which backend serves an analysis call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Vendor-operated Gemini API with native structured output
    #[default]
    Hosted,
    /// Any OpenAI-compatible chat-completions endpoint
    Custom,
}

/// User-supplied OpenAI-compatible endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProvider {
    /// Base URL including the version prefix, e.g. `https://api.openai.com/v1`
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
}

impl CustomProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Check that every field is filled in
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (field, value) in [
            ("base_url", &self.base_url),
            ("api_key", &self.api_key),
            ("model", &self.model),
        ] {
            if value.trim().is_empty() {
                return Err(AnalysisError::Configuration(format!(
                    "custom provider `{}` must not be empty",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Base URL without trailing slashes
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim().trim_end_matches('/'), path)
    }
}

/// Provider selection for one analysis call.
///
/// Built from persisted settings and treated as immutable for the duration of
/// a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomProvider>,
}

impl ProviderConfig {
    pub fn hosted() -> Self {
        Self::default()
    }

    pub fn custom(custom: CustomProvider) -> Self {
        Self {
            kind: ProviderKind::Custom,
            custom: Some(custom),
        }
    }

    /// Fail fast on incomplete custom settings
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match self.kind {
            ProviderKind::Hosted => Ok(()),
            ProviderKind::Custom => self
                .custom
                .as_ref()
                .ok_or_else(|| {
                    AnalysisError::Configuration(
                        "custom provider selected but no endpoint is configured".to_string(),
                    )
                })?
                .validate(),
        }
    }

    /// The custom endpoint, validated
    pub fn require_custom(&self) -> Result<&CustomProvider, AnalysisError> {
        let custom = self.custom.as_ref().ok_or_else(|| {
            AnalysisError::Configuration("no custom provider is configured".to_string())
        })?;
        custom.validate()?;
        Ok(custom)
    }
}

/// Credentials and model for the hosted backend
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HostedConfig {
    /// API key (falls back to GEMINI_API_KEY, then GOOGLE_API_KEY)
    pub api_key: Option<String>,
    #[serde(default = "default_hosted_model")]
    pub model: String,
    #[serde(default = "default_hosted_base_url")]
    pub base_url: String,
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_hosted_model(),
            base_url: default_hosted_base_url(),
        }
    }
}

impl HostedConfig {
    /// Resolve the API key from config, then the environment
    pub fn resolve_api_key(&self) -> Result<String, AnalysisError> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AnalysisError::Configuration(
                    "hosted provider needs an API key (config, GEMINI_API_KEY or GOOGLE_API_KEY)"
                        .to_string(),
                )
            })
    }
}

/// Top-level application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub hosted: HostedConfig,
    /// Provider used when the caller does not pass one
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout: Option<u64>,
    /// Sampling temperature sent to both backends
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hosted: HostedConfig::default(),
            provider: ProviderConfig::default(),
            timeout: None,
            temperature: default_temperature(),
        }
    }
}

// Default value functions
fn default_hosted_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_hosted_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

pub(crate) fn default_temperature() -> f32 {
    0.2
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with GRAPHLENS__ prefix
    /// 2. graphlens.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: GRAPHLENS__HOSTED__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("graphlens").required(false))
        // Use double underscore for nested: GRAPHLENS__PROVIDER__CUSTOM__MODEL
        .add_source(
            Environment::with_prefix("GRAPHLENS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
