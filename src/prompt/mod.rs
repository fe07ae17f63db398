mod schema;

pub use schema::{chart_data_schema, suggestions_schema};

use crate::image::ImageInput;
use crate::model::{ChartType, SuggestionFormat};

/// System prompt template for the data-to-suggestions task.
///
/// Loaded from `suggestions.txt` at compile time. Contains
/// `{{MAX_SUGGESTIONS}}`, `{{SUGGESTION_FIELDS}}` and `{{OUTPUT_RULES}}`
/// placeholders filled in by [`suggestions_prompt`].
pub const SUGGESTIONS_PROMPT: &str = include_str!("suggestions.txt");

/// System prompt for the image-to-data task.
pub const CHART_DATA_PROMPT: &str = include_str!("chart_data.txt");

/// Datasets longer than this many characters are cut before being sent.
pub const MAX_DATA_CHARS: usize = 20_000;

const DEFAULT_MAX_SUGGESTIONS: usize = 3;
const SUGGESTION_LIMIT: usize = 10;

/// User-turn payload
#[derive(Debug, Clone, PartialEq)]
pub enum UserContent {
    Text(String),
    /// Text block followed by an inline image block
    Multimodal { text: String, image: ImageInput },
}

/// Instruction set for one model call
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: UserContent,
    /// JSON Schema for backends with native structured output
    pub response_schema: Option<serde_json::Value>,
    /// The model is told to answer with JSON and nothing else
    pub json_only: bool,
}

/// Knobs for the suggestions task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionOptions {
    pub format: SuggestionFormat,
    /// Ask for a prose analysis followed by a fenced JSON block
    pub with_report: bool,
    pub max_suggestions: usize,
}

impl Default for SuggestionOptions {
    fn default() -> Self {
        Self {
            format: SuggestionFormat::default(),
            with_report: false,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

impl SuggestionOptions {
    fn suggestion_count(&self) -> usize {
        self.max_suggestions.clamp(1, SUGGESTION_LIMIT)
    }
}

/// Build the prompt asking for chart suggestions for `data`
pub fn suggestions_prompt(data: &str, options: &SuggestionOptions) -> Prompt {
    let system = SUGGESTIONS_PROMPT
        .replace(
            "{{MAX_SUGGESTIONS}}",
            &options.suggestion_count().to_string(),
        )
        .replace("{{SUGGESTION_FIELDS}}", &suggestion_fields(options.format))
        .replace("{{OUTPUT_RULES}}", &output_rules(options));

    let response_schema = if options.with_report {
        None
    } else {
        Some(suggestions_schema(options.format))
    };

    Prompt {
        system: system.trim().to_string(),
        user: UserContent::Text(format!("Dataset:\n{}", truncate_data(data))),
        response_schema,
        json_only: !options.with_report,
    }
}

/// Build the multimodal prompt asking to read data back from a chart image
pub fn chart_data_prompt(image: &ImageInput) -> Prompt {
    Prompt {
        system: CHART_DATA_PROMPT.trim().to_string(),
        user: UserContent::Multimodal {
            text: "Extract the data shown in this image.".to_string(),
            image: image.clone(),
        },
        response_schema: Some(chart_data_schema()),
        json_only: true,
    }
}

fn suggestion_fields(format: SuggestionFormat) -> String {
    match format {
        SuggestionFormat::Typed => {
            let types = ChartType::ALL
                .iter()
                .map(|t| format!("\"{}\"", t))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "- \"chartType\": one of {}\n\
                 - \"title\": a short chart title\n\
                 - \"reason\": one sentence on why this chart fits the data\n\
                 - \"data\": a non-empty array of flat JSON objects ready to plot, \
                 one per point, e.g. [{{\"name\": \"a\", \"value\": 1}}]",
                types
            )
        }
        SuggestionFormat::ChartSpec => "- \"title\": a short chart title\n\
             - \"spec\": a complete Vega-Lite v5 specification object with the data \
             embedded inline under \"data\": {\"values\": [...]}"
            .to_string(),
    }
}

fn output_rules(options: &SuggestionOptions) -> String {
    let example = match options.format {
        SuggestionFormat::Typed => {
            r#"{"suggestions": [{"chartType": "bar", "title": "...", "reason": "...", "data": [{"name": "...", "value": 0}]}]}"#
        }
        SuggestionFormat::ChartSpec => {
            r#"{"suggestions": [{"title": "...", "spec": {"$schema": "https://vega.github.io/schema/vega-lite/v5.json", "mark": "bar", "data": {"values": []}, "encoding": {}}}]}"#
        }
    };

    if options.with_report {
        format!(
            "Start with a short analysis of the dataset in plain prose (a few \
             sentences, no headings). Then output exactly one fenced code block \
             labelled json containing:\n\n```json\n{}\n```\n\nDo not write anything after the code block.",
            example
        )
    } else {
        format!(
            "Respond only with JSON, without Markdown fences or commentary, in this shape:\n\n{}",
            example
        )
    }
}

fn truncate_data(data: &str) -> String {
    let data = data.trim();
    match data.char_indices().nth(MAX_DATA_CHARS) {
        Some((cut, _)) => format!("{}\n[... dataset truncated ...]", &data[..cut]),
        None => data.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_embedded() {
        assert!(SUGGESTIONS_PROMPT.contains("{{MAX_SUGGESTIONS}}"));
        assert!(SUGGESTIONS_PROMPT.contains("{{OUTPUT_RULES}}"));
        assert!(CHART_DATA_PROMPT.contains("\"isChart\": false"));
    }

    #[test]
    fn test_suggestions_prompt_fills_placeholders() {
        let prompt = suggestions_prompt("name,value\na,1", &SuggestionOptions::default());
        assert!(!prompt.system.contains("{{"));
        assert!(prompt.system.contains("up to 3 charts"));
        assert!(prompt.system.contains("\"radar\""));
        assert!(prompt.system.contains("Respond only with JSON"));
        assert!(prompt.json_only);
        assert!(prompt.response_schema.is_some());
        assert_eq!(
            prompt.user,
            UserContent::Text("Dataset:\nname,value\na,1".to_string())
        );
    }

    #[test]
    fn test_report_variant_asks_for_fence() {
        let options = SuggestionOptions {
            with_report: true,
            ..Default::default()
        };
        let prompt = suggestions_prompt("x,y\n1,2", &options);
        assert!(prompt.system.contains("```json"));
        assert!(!prompt.json_only);
        assert!(prompt.response_schema.is_none());
    }

    #[test]
    fn test_chart_spec_format_mentions_vega_lite() {
        let options = SuggestionOptions {
            format: SuggestionFormat::ChartSpec,
            ..Default::default()
        };
        let prompt = suggestions_prompt("x,y\n1,2", &options);
        assert!(prompt.system.contains("Vega-Lite"));
        assert!(!prompt.system.contains("chartType"));
    }

    #[test]
    fn test_max_suggestions_is_clamped() {
        let options = SuggestionOptions {
            max_suggestions: 0,
            ..Default::default()
        };
        assert!(suggestions_prompt("a", &options).system.contains("up to 1 charts"));

        let options = SuggestionOptions {
            max_suggestions: 50,
            ..Default::default()
        };
        assert!(suggestions_prompt("a", &options).system.contains("up to 10 charts"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let options = SuggestionOptions::default();
        assert_eq!(
            suggestions_prompt("a,b\n1,2", &options),
            suggestions_prompt("a,b\n1,2", &options)
        );
    }

    #[test]
    fn test_long_data_is_truncated_on_char_boundary() {
        let data = "é".repeat(MAX_DATA_CHARS + 10);
        let truncated = truncate_data(&data);
        assert!(truncated.ends_with("[... dataset truncated ...]"));
        assert_eq!(truncated.chars().filter(|c| *c == 'é').count(), MAX_DATA_CHARS);
    }

    #[test]
    fn test_chart_data_prompt_is_multimodal() {
        let image = ImageInput {
            mime_type: "image/png".into(),
            data: "dGVzdA==".into(),
        };
        let prompt = chart_data_prompt(&image);
        assert!(prompt.json_only);
        match prompt.user {
            UserContent::Multimodal { image: inline, .. } => assert_eq!(inline, image),
            UserContent::Text(_) => panic!("expected multimodal content"),
        }
    }
}
