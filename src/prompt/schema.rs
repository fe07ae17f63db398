use serde_json::{json, Value};

use crate::model::{ChartType, SuggestionFormat};

fn records_schema() -> Value {
    json!({
        "type": "array",
        "minItems": 1,
        "items": {
            "type": "object",
            "additionalProperties": {"type": ["string", "number", "boolean", "null"]}
        }
    })
}

/// JSON Schema for the suggestions response
pub fn suggestions_schema(format: SuggestionFormat) -> Value {
    let item = match format {
        SuggestionFormat::Typed => {
            let chart_types: Vec<&str> = ChartType::ALL.iter().map(|t| t.as_str()).collect();
            json!({
                "type": "object",
                "properties": {
                    "chartType": {"type": "string", "enum": chart_types},
                    "title": {"type": "string"},
                    "reason": {"type": "string"},
                    "data": records_schema()
                },
                "required": ["chartType", "title", "reason", "data"]
            })
        }
        SuggestionFormat::ChartSpec => json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "spec": {"type": "object"}
            },
            "required": ["title", "spec"]
        }),
    };

    json!({
        "type": "object",
        "properties": {
            "suggestions": {"type": "array", "minItems": 1, "items": item}
        },
        "required": ["suggestions"]
    })
}

/// JSON Schema for the chart-reading response
pub fn chart_data_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "isChart": {"type": "boolean"},
            "report": {"type": "string"},
            "data": records_schema(),
            "reason": {"type": "string"}
        },
        "required": ["isChart"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_schema_enumerates_chart_types() {
        let schema = suggestions_schema(SuggestionFormat::Typed);
        let allowed = &schema["properties"]["suggestions"]["items"]["properties"]["chartType"]["enum"];
        assert_eq!(allowed.as_array().unwrap().len(), ChartType::ALL.len());
        assert_eq!(allowed[0], "bar");
    }

    #[test]
    fn test_spec_schema_requires_spec() {
        let schema = suggestions_schema(SuggestionFormat::ChartSpec);
        let required = &schema["properties"]["suggestions"]["items"]["required"];
        assert_eq!(required, &json!(["title", "spec"]));
    }

    #[test]
    fn test_chart_data_schema_requires_is_chart() {
        assert_eq!(chart_data_schema()["required"], json!(["isChart"]));
    }
}
