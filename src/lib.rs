//! Chart suggestions from tabular data, and tabular data from chart images,
//! using a hosted Gemini model or any OpenAI-compatible endpoint.
//!
//! ```no_run
//! # use graphlens::{ChartAnalyzer, AnalysisResult};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! match ChartAnalyzer::builder().data("name,value\na,1\nb,2").build().await? {
//!     AnalysisResult::Suggestions(s) => println!("{} suggestions", s.suggestions.len()),
//!     AnalysisResult::ChartData(_) => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod image;
pub mod model;
pub mod pipelines;
pub mod prompt;
pub mod providers;
pub mod response;
pub mod retry;
pub mod settings;
pub mod validator;

pub use builder::{AnalysisInput, AnalysisResult, ChartAnalyzer, ChartAnalyzerBuilder};
pub use config::{AppConfig, CustomProvider, HostedConfig, ProviderConfig, ProviderKind};
pub use error::{AnalysisError, ConnectionTestError};
pub use image::{ImageInput, ImageSource};
pub use model::{
    ChartData, ChartType, ExtractedData, ExtractedDataResponse, GraphSuggestion,
    GraphSuggestions, Record, SuggestionBody, SuggestionFormat,
};
pub use pipelines::{analyze_chart_image, data_to_graph_suggestions, graph_to_data, AnalysisTask};
pub use prompt::SuggestionOptions;
pub use providers::{GoogleProvider, LlmProvider, OpenAICompatibleProvider, ProviderFactory};
pub use response::{extract_json, ExtractedJson};
pub use settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};

/// Suggest charts for `data` using `provider`.
///
/// Hosted credentials, temperature and timeout come from [`AppConfig::load`].
pub async fn suggest_graphs(
    data: &str,
    provider: &ProviderConfig,
) -> Result<GraphSuggestions, AnalysisError> {
    let config = AppConfig::load()?;
    let llm = ProviderFactory::for_provider(provider, &config)?;
    data_to_graph_suggestions(data, llm.as_ref(), &SuggestionOptions::default()).await
}

/// Read the data shown in a chart image using `provider`.
///
/// A "not a chart" answer is returned as [`AnalysisError::SemanticRejection`].
pub async fn chart_to_data(
    image: &ImageInput,
    provider: &ProviderConfig,
) -> Result<ChartData, AnalysisError> {
    let config = AppConfig::load()?;
    let llm = ProviderFactory::for_provider(provider, &config)?;
    graph_to_data(image, llm.as_ref()).await
}

/// List the models a custom endpoint offers, sorted.
///
/// Only incomplete configuration is an error; an unreachable endpoint or an
/// unexpected response gives an empty list.
pub async fn list_models(endpoint: &CustomProvider) -> Result<Vec<String>, AnalysisError> {
    let provider =
        OpenAICompatibleProvider::new(endpoint, crate::config::default_temperature(), None)?;
    Ok(provider.list_models().await)
}

/// Check that a custom endpoint accepts our key and model
pub async fn test_connection(endpoint: &CustomProvider) -> Result<(), ConnectionTestError> {
    let provider =
        OpenAICompatibleProvider::new(endpoint, crate::config::default_temperature(), None)
            .map_err(|e| ConnectionTestError::Configuration(e.to_string()))?;
    provider.test_connection().await
}
