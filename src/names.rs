//! Source identifier to shell identifier mapping and small text helpers.

/// Mangle a source identifier into a valid shell variable name.
///
/// `camelCase` becomes `camel_case`, anything outside `[A-Za-z0-9_]` becomes
/// `_` (non-ASCII letters included), and a leading `_` is added when the result would be empty or start
/// with a digit.
pub fn to_shell_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if !result.is_empty() {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else if ch.is_ascii_alphanumeric() || ch == '_' {
            result.push(ch);
        } else {
            result.push('_');
        }
    }
    if result.chars().next().is_none_or(|c| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Wrap `text` in single quotes, escaping embedded single quotes.
pub fn single_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\"'\"'"))
}

/// Collapse runs of whitespace so a construct fits on one comment line.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` to at most `width` characters, marking the cut with `...`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
