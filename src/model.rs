use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One row of tabular data as returned by the model
pub type Record = Map<String, Value>;

/// Chart kinds a suggestion may name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Bar,
    Line,
    Area,
    Pie,
    Scatter,
    Radar,
}

impl ChartType {
    pub const ALL: [ChartType; 6] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Area,
        ChartType::Pie,
        ChartType::Scatter,
        ChartType::Radar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Bar => "bar",
            ChartType::Line => "line",
            ChartType::Area => "area",
            ChartType::Pie => "pie",
            ChartType::Scatter => "scatter",
            ChartType::Radar => "radar",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown chart type `{}`", wanted))
    }
}

/// Shape the suggestions task asks the model for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuggestionFormat {
    /// `{chartType, title, reason, data}` with a fixed set of chart types
    #[default]
    Typed,
    /// `{title, spec}` where `spec` is a Vega-Lite specification
    ChartSpec,
}

impl FromStr for SuggestionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "typed" => Ok(SuggestionFormat::Typed),
            "spec" | "chart-spec" | "vega-lite" => Ok(SuggestionFormat::ChartSpec),
            other => Err(format!("unknown suggestion format `{}`", other)),
        }
    }
}

/// A single visualization proposed for the user's data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSuggestion {
    pub title: String,
    #[serde(flatten)]
    pub body: SuggestionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SuggestionBody {
    /// Library-specific chart spec (never empty)
    Spec { spec: Map<String, Value> },
    /// Chart type plus the data series to plot (never empty)
    #[serde(rename_all = "camelCase")]
    Chart {
        chart_type: ChartType,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        data: Vec<Record>,
    },
}

/// Result of the data-to-suggestions task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSuggestions {
    /// Free-text analysis, when the model produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    /// Never empty on success
    pub suggestions: Vec<GraphSuggestion>,
}

/// Data read back from a chart image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Record>>,
}

/// Result of the image-to-data task.
///
/// Exactly one branch is populated, so a "not a chart" answer can never carry
/// data and a chart answer can never carry a rejection reason.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedData {
    Chart(ChartData),
    NotChart { reason: String },
}

/// Wire form of [`ExtractedData`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDataResponse {
    pub is_chart: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Record>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ExtractedData> for ExtractedDataResponse {
    fn from(extracted: ExtractedData) -> Self {
        match extracted {
            ExtractedData::Chart(chart) => ExtractedDataResponse {
                is_chart: true,
                report: chart.report,
                data: chart.data,
                reason: None,
            },
            ExtractedData::NotChart { reason } => ExtractedDataResponse {
                is_chart: false,
                report: None,
                data: None,
                reason: Some(reason),
            },
        }
    }
}
