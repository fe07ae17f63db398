use log::{debug, info};

use super::AnalysisTask;
use crate::error::AnalysisError;
use crate::image::ImageInput;
use crate::model::{ChartData, ExtractedData};
use crate::prompt::chart_data_prompt;
use crate::providers::LlmProvider;
use crate::response::extract_json;
use crate::validator::map_extracted_data;

/// Read the data back out of a chart image.
///
/// Returns both outcomes the model may give: the chart's data, or its
/// statement that the image is not a chart.
pub async fn analyze_chart_image(
    image: &ImageInput,
    provider: &dyn LlmProvider,
) -> Result<ExtractedData, AnalysisError> {
    let prompt = chart_data_prompt(image);
    info!(
        "Running {} with {} ({})",
        AnalysisTask::GraphToData.as_str(),
        provider.provider_name(),
        image.mime_type
    );

    let raw = provider.complete(&prompt).await?;
    debug!("Raw chart data response: {}", raw);

    map_extracted_data(&extract_json(&raw)?)
}

/// Like [`analyze_chart_image`], with "not a chart" reported as
/// [`AnalysisError::SemanticRejection`]
pub async fn graph_to_data(
    image: &ImageInput,
    provider: &dyn LlmProvider,
) -> Result<ChartData, AnalysisError> {
    match analyze_chart_image(image, provider).await? {
        ExtractedData::Chart(chart) => Ok(chart),
        ExtractedData::NotChart { reason } => {
            info!("Model rejected image: {}", reason);
            Err(AnalysisError::SemanticRejection { reason })
        }
    }
}
