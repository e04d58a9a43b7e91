use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hashes a sequence of string parts with separators so that `["ab", "c"]` and
/// `["a", "bc"]` differ.
pub fn stable_hash<'a>(parts: impl IntoIterator<Item = &'a str>) -> u64 {
    let mut hasher = DefaultHasher::new();
    for part in parts {
        part.len().hash(&mut hasher);
        part.hash(&mut hasher);
    }
    hasher.finish()
}

/// Shortens `text` to at most `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut out = text
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}
