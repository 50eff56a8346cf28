//! Truncation policy for announcement snippets.

/// Ellipsis marker appended to every clipped snippet.
pub const ELLIPSIS: &str = "...";

/// Character budget used by the home page preview.
pub const HOME_SNIPPET_BUDGET: usize = 135;

/// Character budget used by the compact page variant.
pub const COMPACT_SNIPPET_BUDGET: usize = 80;

/// Clips `text` to at most `budget` characters and appends [`ELLIPSIS`].
///
/// If the clipped prefix ends in a space, exactly that one character is
/// dropped before the ellipsis. This is a single-character boundary check,
/// not a trim: any whitespace earlier in the prefix survives.
pub fn clip_to_budget(text: &str, budget: usize) -> String {
    let mut prefix: String = text.chars().take(budget).collect();
    if prefix.ends_with(' ') {
        prefix.pop();
    }
    prefix.push_str(ELLIPSIS);
    prefix
}
