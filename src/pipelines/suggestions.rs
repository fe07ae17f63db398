use log::{debug, info};

use super::AnalysisTask;
use crate::error::AnalysisError;
use crate::model::GraphSuggestions;
use crate::prompt::{suggestions_prompt, SuggestionOptions};
use crate::providers::LlmProvider;
use crate::response::extract_json;
use crate::validator::map_suggestions;

/// Ask the model which charts suit `data`.
///
/// This pipeline:
/// 1. Builds the suggestions prompt for the requested format
/// 2. Sends it through `provider` (one request, no retry)
/// 3. Extracts the JSON payload and any leading report prose
/// 4. Validates it into at least one suggestion
///
/// # Errors
/// `InvalidInput` for blank data, otherwise whatever the transport,
/// extractor or validator reports. Success always carries a non-empty list.
pub async fn data_to_graph_suggestions(
    data: &str,
    provider: &dyn LlmProvider,
    options: &SuggestionOptions,
) -> Result<GraphSuggestions, AnalysisError> {
    if data.trim().is_empty() {
        return Err(AnalysisError::InvalidInput(
            "data to analyse cannot be empty".to_string(),
        ));
    }

    let prompt = suggestions_prompt(data, options);
    info!(
        "Running {} with {}",
        AnalysisTask::DataToGraphSuggestions.as_str(),
        provider.provider_name()
    );

    let raw = provider.complete(&prompt).await?;
    debug!("Raw suggestions response: {}", raw);

    let extracted = extract_json(&raw)?;
    let suggestions = map_suggestions(&extracted, options.format)?;
    info!("Received {} chart suggestions", suggestions.suggestions.len());

    Ok(suggestions)
}
