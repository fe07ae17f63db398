use std::borrow::Cow;

/// Remove commas that directly precede a closing `}` or `]`.
///
/// Whitespace between the comma and the closer is kept. Commas inside string
/// literals are left alone. Input without such commas is returned borrowed.
pub fn strip_trailing_commas(candidate: &str) -> Cow<'_, str> {
    let mut dangling = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut pending_comma: Option<usize> = None;

    for (idx, c) in candidate.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                pending_comma = None;
                in_string = true;
            }
            ',' => pending_comma = Some(idx),
            '}' | ']' => {
                if let Some(comma) = pending_comma.take() {
                    dangling.push(comma);
                }
            }
            c if c.is_whitespace() => {}
            _ => pending_comma = None,
        }
    }

    if dangling.is_empty() {
        return Cow::Borrowed(candidate);
    }

    let mut repaired = String::with_capacity(candidate.len());
    let mut last = 0;
    for comma in dangling {
        repaired.push_str(&candidate[last..comma]);
        last = comma + 1;
    }
    repaired.push_str(&candidate[last..]);
    Cow::Owned(repaired)
}
