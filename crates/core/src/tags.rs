//! Comma-separated tag text used by the project form.

/// Split on `,`, trim each piece and drop empties.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join with `", "`. Tags that themselves contain commas do not survive a
/// later [`split_tags`].
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}
