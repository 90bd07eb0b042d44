//! Text normalization for deduplication comparison

/// Canonical comparison form of free text
///
/// - Converts to lowercase
/// - Replaces every character outside `[a-z0-9]` with a space
/// - Collapses whitespace and trims
pub fn clean(s: &str) -> String {
    let folded: String = s
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();

    collapse_whitespace(&folded)
}

/// Cut a title at its first subtitle separator
///
/// Separators are `:`, `(`, en-dash, em-dash and hyphen, so
/// `"Leviathan Wakes (The Expanse)"` becomes `"Leviathan Wakes"`.
pub fn strip_subtitle(title: &str) -> &str {
    let base = match title.find([':', '(', '\u{2013}', '\u{2014}', '-']) {
        Some(pos) => &title[..pos],
        None => title,
    };
    base.trim()
}

/// Remove one leading `"The "`, `"A "` or `"An "` (case-sensitive)
pub fn strip_leading_article(title: &str) -> &str {
    let title = title.trim();
    for article in ["The ", "A ", "An "] {
        if let Some(rest) = title.strip_prefix(article) {
            return rest;
        }
    }
    title
}

/// Collapse runs of whitespace into single spaces, trimming both ends
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
