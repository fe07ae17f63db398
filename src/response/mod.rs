//! Recovering JSON from free-form model output.
//!
//! Models that lack native structured output tend to wrap their answer in a
//! Markdown fence, surround it with prose, or leave trailing commas behind.
//! [`extract_json`] tries the following, in order:
//!
//! 1. the first code fence labelled `json`
//! 2. the span from the earliest `{`/`[` to the last matching closer
//! 3. the whole trimmed text, if it starts with `{` or `[`
//!
//! The candidate then has trailing commas stripped and is parsed. Prose in
//! front of a fence is kept as a narrative. Without a fence no split is
//! attempted, since the boundary between prose and JSON is ambiguous.

mod fence;
mod repair;

pub use fence::{find_json_fence, JsonFence};
pub use repair::strip_trailing_commas;

use log::debug;
use serde_json::Value;

use crate::error::AnalysisError;

const PREVIEW_CHARS: usize = 200;

/// Which rule produced the JSON candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    Fenced,
    Bracketed,
    WholeText,
}

/// A located, not yet parsed, JSON candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub text: &'a str,
    pub origin: CandidateOrigin,
    /// Prose preceding a fenced block
    pub narrative: Option<&'a str>,
}

/// Parsed model output
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedJson {
    pub value: Value,
    pub narrative: Option<String>,
    pub origin: CandidateOrigin,
}

/// Locate the most likely JSON substring in `raw`
pub fn locate_candidate(raw: &str) -> Option<Candidate<'_>> {
    if let Some(fence) = find_json_fence(raw) {
        let narrative = raw[..fence.start].trim();
        return Some(Candidate {
            text: fence.interior,
            origin: CandidateOrigin::Fenced,
            narrative: (!narrative.is_empty()).then_some(narrative),
        });
    }

    if let Some(span) = bracketed_span(raw) {
        return Some(Candidate {
            text: span,
            origin: CandidateOrigin::Bracketed,
            narrative: None,
        });
    }

    let trimmed = raw.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Some(Candidate {
            text: trimmed,
            origin: CandidateOrigin::WholeText,
            narrative: None,
        });
    }

    None
}

/// Earliest opener up to the last closer of the same kind.
///
/// When the earliest opener has no closer after it, the other bracket kind is
/// tried instead.
fn bracketed_span(text: &str) -> Option<&str> {
    let span_for = |open: char, close: char| -> Option<(usize, usize)> {
        let start = text.find(open)?;
        let end = text.rfind(close)?;
        (end > start).then_some((start, end))
    };

    let object = span_for('{', '}');
    let array = span_for('[', ']');

    let (start, end) = match (object, array) {
        (Some(o), Some(a)) => {
            if o.0 < a.0 {
                o
            } else {
                a
            }
        }
        (Some(span), None) | (None, Some(span)) => span,
        (None, None) => return None,
    };

    Some(&text[start..=end])
}

/// Extract and parse the JSON payload of a model response
pub fn extract_json(raw: &str) -> Result<ExtractedJson, AnalysisError> {
    let candidate = locate_candidate(raw).ok_or_else(|| AnalysisError::Extraction {
        preview: preview(raw),
    })?;
    debug!(
        "Located {:?} JSON candidate ({} bytes)",
        candidate.origin,
        candidate.text.len()
    );

    let repaired = strip_trailing_commas(candidate.text);
    let value = serde_json::from_str(&repaired).map_err(|source| AnalysisError::MalformedJson {
        raw: raw.to_string(),
        candidate: candidate.text.to_string(),
        source,
    })?;

    Ok(ExtractedJson {
        value,
        narrative: candidate.narrative.map(str::to_string),
        origin: candidate.origin,
    })
}

fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
