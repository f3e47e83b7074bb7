//! Removal of presentation wrapping from service replies.

const FENCE: &str = "```";

/// Trim whitespace and unwrap a surrounding Markdown code fence, if any.
///
/// A fence may carry a language tag (```` ```sql ````); the tag is dropped.
/// Anything else on the opening line is kept as part of the body. Text
/// without a leading fence is only trimmed.
pub fn strip_wrapping(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = match after_open.split_once('\n') {
        Some((first_line, rest)) if is_language_tag(first_line) => rest,
        _ => after_open,
    };

    body.trim_end()
        .strip_suffix(FENCE)
        .unwrap_or(body)
        .trim()
}

/// Words that open a statement; a fence line holding one of these is SQL.
const STATEMENT_KEYWORDS: &[&str] = &[
    "select", "with", "insert", "update", "delete", "merge", "create", "alter", "drop",
    "values", "from", "where",
];

/// Empty, or a lowercase info string such as `sql`, `json` or `postgresql`.
fn is_language_tag(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return true;
    }
    line.len() <= 20
        && line.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' || c == '+'
        })
        && !STATEMENT_KEYWORDS.contains(&line)
}
