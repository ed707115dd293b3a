//! Criteria helpers shared by every record search.
//!
//! This module lives in `core` (zero internal deps) so the rules for which
//! criteria fields participate in a filter are testable without a store.

/// Escape character used in every `LIKE ... ESCAPE` clause.
pub const LIKE_ESCAPE: char = '\\';

/// Escape `LIKE` wildcards so caller text is matched literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == LIKE_ESCAPE || c == '%' || c == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// Build a prefix-match pattern (`value%`) with wildcards in `value` escaped.
pub fn prefix_pattern(value: &str) -> String {
    let mut pattern = escape_like(value);
    pattern.push('%');
    pattern
}

/// A text criterion participates only when present and non-empty.
pub fn text_criterion(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// A numeric identity criterion participates only when present and positive.
pub fn id_criterion(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v > 0)
}
