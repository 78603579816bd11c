//! Comma-separated tag token extraction.
//!
//! The search box holds a list of tags separated by commas. The last segment
//! is the one the user is still typing and drives autocomplete.

/// Separator between tag tokens.
pub const SEPARATOR: char = ',';

/// Text placed between tokens when the box is rewritten.
pub const JOINER: &str = ", ";

/// Trimmed segments of `raw`, including empty ones.
pub fn segments(raw: &str) -> impl DoubleEndedIterator<Item = &str> {
    raw.trim().split(SEPARATOR).map(str::trim)
}

/// The token currently being typed: everything after the last comma, trimmed.
///
/// Empty and comma-terminated inputs yield `""`, which is always below the
/// suggestion threshold.
pub fn extract_in_progress_token(raw: &str) -> &str {
    segments(raw).next_back().unwrap_or_default()
}

/// Length of a token as the suggestion threshold counts it.
pub fn token_len(token: &str) -> usize {
    token.chars().count()
}

/// Non-blank tag terms in order of appearance.
pub fn tag_terms(raw: &str) -> Vec<&str> {
    segments(raw).filter(|segment| !segment.is_empty()).collect()
}

/// Replace the in-progress token with `suggestion`.
///
/// Completed tokens are kept (re-trimmed and re-joined) and a trailing
/// separator is appended so the user can type the next tag straight away.
pub fn replace_in_progress_token(raw: &str, suggestion: &str) -> String {
    let mut parts: Vec<&str> = segments(raw).collect();
    parts.pop();
    parts.push(suggestion);

    let mut rewritten = parts.join(JOINER);
    rewritten.push_str(JOINER);
    rewritten
}
