//! Pickable words inside generated text.
//!
//! Every word of a definition is a way back into the exploration loop. The
//! presentation layer numbers the words returned here and resolves the one
//! the user picks as the next topic.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Topic;

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'’\-]*").expect("word pattern is valid")
});

/// Returns the distinct words of `text` in reading order.
///
/// Markdown emphasis markers and punctuation are not part of any word.
/// Duplicates are detected case-insensitively; the first spelling wins.
/// Trailing apostrophes and hyphens are trimmed.
pub fn clickable_words(text: &str) -> Vec<Topic> {
    let mut seen = HashSet::new();
    WORD.find_iter(text)
        .filter_map(|m| Topic::parse(m.as_str().trim_end_matches(['\'', '’', '-'])))
        .filter(|word| seen.insert(word.key()))
        .collect()
}
