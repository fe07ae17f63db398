pub mod chart_data;
pub mod suggestions;

pub use chart_data::{analyze_chart_image, graph_to_data};
pub use suggestions::data_to_graph_suggestions;

/// The two analyses this crate performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisTask {
    /// Tabular data in, chart suggestions out
    DataToGraphSuggestions,
    /// Chart image in, tabular data out
    GraphToData,
}

impl AnalysisTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisTask::DataToGraphSuggestions => "data_to_graph_suggestions",
            AnalysisTask::GraphToData => "graph_to_data",
        }
    }
}
