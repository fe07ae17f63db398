/// A fenced code block labelled `json`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFence<'a> {
    /// Byte offset of the opening fence
    pub start: usize,
    /// Text between the opening fence line and the closing fence, trimmed
    pub interior: &'a str,
}

const FENCES: [&str; 2] = ["```", "~~~"];

/// Find the first closed code fence whose info string is `json`.
///
/// Backtick and tilde fences are both accepted; the closing fence must use
/// the same characters as the opening one. Fences with another label, no
/// label, or no closing fence are skipped.
pub fn find_json_fence(text: &str) -> Option<JsonFence<'_>> {
    FENCES
        .iter()
        .filter_map(|marker| find_with_marker(text, marker))
        .min_by_key(|fence| fence.start)
}

fn find_with_marker<'a>(text: &'a str, marker: &str) -> Option<JsonFence<'a>> {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find(marker) {
        let start = search_from + offset;
        let after_marker = start + marker.len();
        // Longer fences (````) are consumed whole
        let label_start = after_marker
            + text[after_marker..]
                .chars()
                .take_while(|c| marker.starts_with(*c))
                .map(char::len_utf8)
                .sum::<usize>();

        let rest = &text[label_start..];
        let label_end = rest
            .find(|c: char| c.is_whitespace() || c == '{' || c == '[')
            .unwrap_or(rest.len());
        let label = rest[..label_end].trim();

        if label.eq_ignore_ascii_case("json") {
            let body_start = label_start + label_end;
            if let Some(close) = text[body_start..].find(marker) {
                return Some(JsonFence {
                    start,
                    interior: text[body_start..body_start + close].trim(),
                });
            }
            return None;
        }

        // A marker inside a line of prose opens nothing
        if !starts_line(text, start) {
            search_from = label_start;
            continue;
        }

        // Skip over the whole block this fence opens, if it is closed
        search_from = match text[label_start..].find(marker) {
            Some(close) => label_start + close + marker.len(),
            None => return None,
        };
    }

    None
}

fn starts_line(text: &str, offset: usize) -> bool {
    let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..offset].trim().is_empty()
}
