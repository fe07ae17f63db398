use crate::config::{AppConfig, HostedConfig, ProviderConfig, ProviderKind};
use crate::error::AnalysisError;
use crate::providers::{GoogleProvider, LlmProvider, OpenAICompatibleProvider};
use std::time::Duration;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration.
    ///
    /// Configuration is validated here, so an incomplete custom endpoint or a
    /// missing hosted key fails before any request is built.
    pub fn create(
        provider: &ProviderConfig,
        hosted: &HostedConfig,
        temperature: f32,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn LlmProvider>, AnalysisError> {
        provider.validate()?;

        match provider.kind {
            ProviderKind::Hosted => Ok(Box::new(GoogleProvider::new(
                hosted,
                temperature,
                timeout,
            )?)),
            ProviderKind::Custom => Ok(Box::new(OpenAICompatibleProvider::new(
                provider.require_custom()?,
                temperature,
                timeout,
            )?)),
        }
    }

    /// Create the provider selected by the application configuration
    pub fn from_app_config(config: &AppConfig) -> Result<Box<dyn LlmProvider>, AnalysisError> {
        Self::for_provider(&config.provider, config)
    }

    /// Create `provider`, taking hosted credentials and HTTP settings from `config`
    pub fn for_provider(
        provider: &ProviderConfig,
        config: &AppConfig,
    ) -> Result<Box<dyn LlmProvider>, AnalysisError> {
        Self::create(
            provider,
            &config.hosted,
            config.temperature,
            config.timeout.map(Duration::from_secs),
        )
    }
}
