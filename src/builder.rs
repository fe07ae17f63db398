use std::time::Duration;

use crate::config::{AppConfig, HostedConfig, ProviderConfig};
use crate::error::AnalysisError;
use crate::image::{ImageInput, ImageSource};
use crate::model::{ChartData, GraphSuggestions, SuggestionFormat};
use crate::pipelines::{data_to_graph_suggestions, graph_to_data};
use crate::prompt::SuggestionOptions;
use crate::providers::{LlmProvider, ProviderFactory};
use crate::retry::RetryingProvider;

/// Represents the input for an analysis
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    /// Tabular data as text (CSV, TSV, Markdown table, JSON)
    Data(String),
    /// Chart image to read data from
    Image(ImageSource),
    /// Chart image already encoded
    InlineImage(ImageInput),
}

/// Result of an analysis
#[derive(Debug, Clone)]
pub enum AnalysisResult {
    Suggestions(GraphSuggestions),
    ChartData(ChartData),
}

/// Builder for configuring and running an analysis
#[derive(Debug, Default)]
pub struct ChartAnalyzerBuilder {
    input: Option<AnalysisInput>,
    provider: Option<ProviderConfig>,
    hosted: Option<HostedConfig>,
    options: SuggestionOptions,
    timeout: Option<Duration>,
    retry: Option<(u32, Duration)>,
}

impl ChartAnalyzerBuilder {
    /// Analyse tabular data and suggest charts
    ///
    /// # Example
    /// ```
    /// use graphlens::ChartAnalyzer;
    ///
    /// let builder = ChartAnalyzer::builder()
    ///     .data("month,sales\nJan,10\nFeb,14");
    /// ```
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.input = Some(AnalysisInput::Data(data.into()));
        self
    }

    /// Read data from an already encoded chart image
    pub fn image(mut self, image: ImageInput) -> Self {
        self.input = Some(AnalysisInput::InlineImage(image));
        self
    }

    /// Read data from a chart image file
    ///
    /// # Example
    /// ```
    /// use graphlens::ChartAnalyzer;
    ///
    /// let builder = ChartAnalyzer::builder()
    ///     .image_file("/path/to/chart.png");
    /// ```
    pub fn image_file(mut self, path: impl Into<String>) -> Self {
        self.input = Some(AnalysisInput::Image(ImageSource::Path(path.into())));
        self
    }

    /// Read data from base64 image data or a `data:` URL
    pub fn image_base64(mut self, data: impl Into<String>, mime_type: Option<String>) -> Self {
        self.input = Some(AnalysisInput::Image(ImageSource::Base64 {
            data: data.into(),
            mime_type,
        }));
        self
    }

    /// Select the provider for this call instead of the configured default
    ///
    /// # Example
    /// ```
    /// use graphlens::{ChartAnalyzer, CustomProvider, ProviderConfig};
    ///
    /// let builder = ChartAnalyzer::builder()
    ///     .data("a,b\n1,2")
    ///     .provider(ProviderConfig::custom(CustomProvider::new(
    ///         "http://localhost:11434/v1",
    ///         "ollama",
    ///         "llama3.2-vision",
    ///     )));
    /// ```
    pub fn provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Hosted credentials and model, overriding the loaded configuration
    pub fn hosted(mut self, hosted: HostedConfig) -> Self {
        self.hosted = Some(hosted);
        self
    }

    /// Shape of the suggestions to ask for
    pub fn format(mut self, format: SuggestionFormat) -> Self {
        self.options.format = format;
        self
    }

    /// Ask for a prose report in front of the suggestions
    pub fn with_report(mut self) -> Self {
        self.options.with_report = true;
        self
    }

    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.options.max_suggestions = max;
        self
    }

    /// Set a timeout for HTTP requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Retry transport failures up to `attempts` times in total
    ///
    /// # Example
    /// ```
    /// use graphlens::ChartAnalyzer;
    /// use std::time::Duration;
    ///
    /// let builder = ChartAnalyzer::builder()
    ///     .data("a,b\n1,2")
    ///     .retry(3, Duration::from_millis(500));
    /// ```
    pub fn retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry = Some((attempts, delay));
        self
    }

    /// Build the provider and run the analysis
    ///
    /// # Errors
    /// Returns `AnalysisError` if:
    /// - No input was specified (`InvalidInput`)
    /// - The provider configuration is incomplete (`Configuration`)
    /// - The request or the model's answer fails
    ///
    /// # Example
    /// ```no_run
    /// # use graphlens::ChartAnalyzer;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = ChartAnalyzer::builder()
    ///     .data("name,value\na,1\nb,2")
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<AnalysisResult, AnalysisError> {
        let input = self.input.ok_or_else(|| {
            AnalysisError::InvalidInput(
                "No input specified. Use .data(), .image() or .image_file()".to_string(),
            )
        })?;

        // Temperature and timeout always come from file/env configuration;
        // builder settings are layered on top
        let mut config = AppConfig::load()?;
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(hosted) = self.hosted {
            config.hosted = hosted;
        }
        let timeout = self
            .timeout
            .or_else(|| config.timeout.map(Duration::from_secs));

        let mut provider: Box<dyn LlmProvider> = ProviderFactory::create(
            &config.provider,
            &config.hosted,
            config.temperature,
            timeout,
        )?;
        if let Some((attempts, delay)) = self.retry {
            provider = Box::new(RetryingProvider::new(provider, attempts, delay));
        }

        match input {
            AnalysisInput::Data(data) => {
                data_to_graph_suggestions(&data, provider.as_ref(), &self.options)
                    .await
                    .map(AnalysisResult::Suggestions)
            }
            AnalysisInput::Image(source) => {
                let image = source.load().await?;
                graph_to_data(&image, provider.as_ref())
                    .await
                    .map(AnalysisResult::ChartData)
            }
            AnalysisInput::InlineImage(image) => graph_to_data(&image, provider.as_ref())
                .await
                .map(AnalysisResult::ChartData),
        }
    }
}

/// Main entry point for the builder API
pub struct ChartAnalyzer;

impl ChartAnalyzer {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use graphlens::ChartAnalyzer;
    ///
    /// let builder = ChartAnalyzer::builder();
    /// ```
    pub fn builder() -> ChartAnalyzerBuilder {
        ChartAnalyzerBuilder::default()
    }
}
