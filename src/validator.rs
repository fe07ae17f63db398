use log::warn;
use serde_json::{Map, Value};

use crate::error::AnalysisError;
use crate::model::{
    ChartData, ChartType, ExtractedData, GraphSuggestion, GraphSuggestions, Record, SuggestionBody,
    SuggestionFormat,
};
use crate::response::ExtractedJson;

/// Map extracted JSON to chart suggestions.
///
/// Accepts `{"suggestions": [...]}` or a bare array. Items that do not fit the
/// requested format are dropped with a warning; an answer where nothing
/// survives is a schema error, so success is never empty.
pub fn map_suggestions(
    extracted: &ExtractedJson,
    format: SuggestionFormat,
) -> Result<GraphSuggestions, AnalysisError> {
    let (items, report) = match &extracted.value {
        Value::Array(items) => (items, None),
        Value::Object(object) => {
            let items = match object.get("suggestions") {
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(AnalysisError::schema("suggestions", "expected an array"))
                }
                None => return Err(AnalysisError::schema("suggestions", "field is missing")),
            };
            (items, optional_string(object, "report")?)
        }
        _ => {
            return Err(AnalysisError::schema(
                "$",
                "expected an object with a `suggestions` array",
            ))
        }
    };

    let mut suggestions = Vec::with_capacity(items.len());
    let mut first_error = None;

    for (index, item) in items.iter().enumerate() {
        match map_suggestion(item, format) {
            Ok(suggestion) => suggestions.push(suggestion),
            Err(e) => {
                warn!("Skipping suggestion {}: {}", index, e);
                if first_error.is_none() {
                    first_error = Some(match e {
                        AnalysisError::Schema { field, message } if field == "$" => {
                            AnalysisError::schema(format!("suggestions[{}]", index), message)
                        }
                        AnalysisError::Schema { field, message } => AnalysisError::schema(
                            format!("suggestions[{}].{}", index, field),
                            message,
                        ),
                        other => other,
                    });
                }
            }
        }
    }

    if suggestions.is_empty() {
        return Err(first_error
            .unwrap_or_else(|| AnalysisError::schema("suggestions", "array is empty")));
    }

    Ok(GraphSuggestions {
        report: report.or_else(|| extracted.narrative.clone()),
        suggestions,
    })
}

fn map_suggestion(
    item: &Value,
    format: SuggestionFormat,
) -> Result<GraphSuggestion, AnalysisError> {
    let object = item
        .as_object()
        .ok_or_else(|| AnalysisError::schema("$", "expected an object"))?;

    let title = required_string(object, "title")?;

    let body = match format {
        SuggestionFormat::ChartSpec => {
            let spec = match object.get("spec") {
                Some(Value::Object(spec)) if !spec.is_empty() => spec.clone(),
                Some(Value::Object(_)) => return Err(AnalysisError::schema("spec", "is empty")),
                Some(_) => return Err(AnalysisError::schema("spec", "expected an object")),
                None => return Err(AnalysisError::schema("spec", "field is missing")),
            };
            SuggestionBody::Spec { spec }
        }
        SuggestionFormat::Typed => {
            let chart_type = required_string(object, "chartType")?
                .parse::<ChartType>()
                .map_err(|e: String| AnalysisError::schema("chartType", e))?;
            let data = records(object, "data")?
                .ok_or_else(|| AnalysisError::schema("data", "field is missing"))?;
            if data.is_empty() {
                return Err(AnalysisError::schema("data", "is empty"));
            }
            SuggestionBody::Chart {
                chart_type,
                reason: optional_string(object, "reason")?,
                data,
            }
        }
    };

    Ok(GraphSuggestion { title, body })
}

/// Map extracted JSON to the chart-reading result.
///
/// `isChart` decides the branch; fields belonging to the other branch are
/// ignored so the result always satisfies the one-branch invariant.
pub fn map_extracted_data(extracted: &ExtractedJson) -> Result<ExtractedData, AnalysisError> {
    let object = extracted
        .value
        .as_object()
        .ok_or_else(|| AnalysisError::schema("$", "expected an object"))?;

    let is_chart = match object.get("isChart") {
        Some(Value::Bool(flag)) => *flag,
        Some(_) => return Err(AnalysisError::schema("isChart", "expected a boolean")),
        None => return Err(AnalysisError::schema("isChart", "field is missing")),
    };

    if !is_chart {
        let reason = optional_string(object, "reason")?
            .ok_or_else(|| AnalysisError::schema("reason", "field is missing"))?;
        return Ok(ExtractedData::NotChart { reason });
    }

    let report = optional_string(object, "report")?.or_else(|| extracted.narrative.clone());
    let data = records(object, "data")?.filter(|rows| !rows.is_empty());

    if report.is_none() && data.is_none() {
        return Err(AnalysisError::schema(
            "data",
            "a chart answer needs `report` or non-empty `data`",
        ));
    }

    Ok(ExtractedData::Chart(ChartData { report, data }))
}

fn required_string(object: &Map<String, Value>, field: &str) -> Result<String, AnalysisError> {
    optional_string(object, field)?
        .ok_or_else(|| AnalysisError::schema(field, "field is missing"))
}

/// Null and blank strings count as absent
fn optional_string(
    object: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, AnalysisError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(AnalysisError::schema(field, "expected a string")),
    }
}

fn records(object: &Map<String, Value>, field: &str) -> Result<Option<Vec<Record>>, AnalysisError> {
    let items = match object.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(AnalysisError::schema(field, "expected an array")),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, row)| {
            row.as_object().cloned().ok_or_else(|| {
                AnalysisError::schema(format!("{}[{}]", field, index), "expected an object")
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::CandidateOrigin;
    use serde_json::json;

    fn extracted(value: Value) -> ExtractedJson {
        ExtractedJson {
            value,
            narrative: None,
            origin: CandidateOrigin::WholeText,
        }
    }

    #[test]
    fn test_typed_suggestions() {
        let json = extracted(json!({
            "suggestions": [{
                "chartType": "Bar",
                "title": "Value by name",
                "reason": "Compares categories",
                "data": [{"name": "a", "value": 1}, {"name": "b", "value": 2}],
                "confidence": 0.9
            }]
        }));
        let result = map_suggestions(&json, SuggestionFormat::Typed).unwrap();
        assert_eq!(result.suggestions.len(), 1);
        assert!(result.report.is_none());
        match &result.suggestions[0].body {
            SuggestionBody::Chart {
                chart_type,
                reason,
                data,
            } => {
                assert_eq!(*chart_type, ChartType::Bar);
                assert_eq!(reason.as_deref(), Some("Compares categories"));
                assert_eq!(data.len(), 2);
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_bare_array_is_accepted() {
        let json = extracted(json!([{"title": "t", "spec": {"mark": "line"}}]));
        let result = map_suggestions(&json, SuggestionFormat::ChartSpec).unwrap();
        assert_eq!(result.suggestions[0].title, "t");
    }

    #[test]
    fn test_invalid_items_are_skipped() {
        let json = extracted(json!({
            "suggestions": [
                {"chartType": "donut", "title": "bad", "data": [{"x": 1}]},
                {"chartType": "pie", "title": "good", "data": [{"x": 1}]}
            ]
        }));
        let result = map_suggestions(&json, SuggestionFormat::Typed).unwrap();
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].title, "good");
    }

    #[test]
    fn test_all_invalid_is_schema_error_naming_field() {
        let json = extracted(json!({
            "suggestions": [{"chartType": "bar", "title": "t", "data": []}]
        }));
        match map_suggestions(&json, SuggestionFormat::Typed).unwrap_err() {
            AnalysisError::Schema { field, .. } => assert_eq!(field, "suggestions[0].data"),
            other => panic!("expected Schema, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_suggestions_is_error() {
        let json = extracted(json!({"suggestions": []}));
        assert!(matches!(
            map_suggestions(&json, SuggestionFormat::Typed),
            Err(AnalysisError::Schema { .. })
        ));
    }

    #[test]
    fn test_missing_suggestions_field() {
        let json = extracted(json!({"charts": []}));
        match map_suggestions(&json, SuggestionFormat::Typed).unwrap_err() {
            AnalysisError::Schema { field, .. } => assert_eq!(field, "suggestions"),
            other => panic!("expected Schema, got {:?}", other),
        }
    }

    #[test]
    fn test_suggestions_must_be_array() {
        let json = extracted(json!({"suggestions": "bar chart"}));
        assert!(map_suggestions(&json, SuggestionFormat::Typed).is_err());
    }

    #[test]
    fn test_empty_spec_rejected() {
        let json = extracted(json!({"suggestions": [{"title": "t", "spec": {}}]}));
        assert!(map_suggestions(&json, SuggestionFormat::ChartSpec).is_err());
    }

    #[test]
    fn test_narrative_becomes_report() {
        let json = ExtractedJson {
            value: json!({"suggestions": [{"title": "t", "spec": {"mark": "bar"}}]}),
            narrative: Some("Sales grow every quarter.".into()),
            origin: CandidateOrigin::Fenced,
        };
        let result = map_suggestions(&json, SuggestionFormat::ChartSpec).unwrap();
        assert_eq!(result.report.as_deref(), Some("Sales grow every quarter."));
    }

    #[test]
    fn test_not_chart_branch() {
        let json = extracted(json!({"isChart": false, "reason": "a cat", "data": [{"x": 1}]}));
        assert_eq!(
            map_extracted_data(&json).unwrap(),
            ExtractedData::NotChart {
                reason: "a cat".into()
            }
        );
    }

    #[test]
    fn test_not_chart_without_reason_is_schema_error() {
        let json = extracted(json!({"isChart": false}));
        match map_extracted_data(&json).unwrap_err() {
            AnalysisError::Schema { field, .. } => assert_eq!(field, "reason"),
            other => panic!("expected Schema, got {:?}", other),
        }
    }

    #[test]
    fn test_chart_branch_ignores_reason() {
        let json = extracted(json!({
            "isChart": true,
            "report": "Revenue doubles",
            "data": [{"year": "2023", "revenue": 10}],
            "reason": "leftover"
        }));
        match map_extracted_data(&json).unwrap() {
            ExtractedData::Chart(chart) => {
                assert_eq!(chart.report.as_deref(), Some("Revenue doubles"));
                assert_eq!(chart.data.unwrap().len(), 1);
            }
            other => panic!("expected chart, got {:?}", other),
        }
    }

    #[test]
    fn test_chart_without_report_or_data() {
        let json = extracted(json!({"isChart": true, "data": []}));
        assert!(matches!(
            map_extracted_data(&json),
            Err(AnalysisError::Schema { .. })
        ));
    }

    #[test]
    fn test_is_chart_must_be_boolean() {
        let json = extracted(json!({"isChart": "yes", "report": "x"}));
        match map_extracted_data(&json).unwrap_err() {
            AnalysisError::Schema { field, .. } => assert_eq!(field, "isChart"),
            other => panic!("expected Schema, got {:?}", other),
        }
    }

    #[test]
    fn test_data_rows_must_be_objects() {
        let json = extracted(json!({"isChart": true, "data": [1, 2]}));
        match map_extracted_data(&json).unwrap_err() {
            AnalysisError::Schema { field, .. } => assert_eq!(field, "data[0]"),
            other => panic!("expected Schema, got {:?}", other),
        }
    }
}
