//! Prompt templates.
//!
//! Shared by direct provider clients and the proxy server so both render the
//! same request for a topic.

use crate::models::{ArtStyle, ContentKind, ImageOptions, Prompt, Topic};

/// Prompt for the streamed definition.
pub fn definition(topic: &Topic) -> Prompt {
    Prompt::new(
        topic.clone(),
        ContentKind::Definition,
        format!(
            "Provide a concise, single-paragraph encyclopedia-style definition for the term: \
             \"{topic}\". Be informative and neutral. You may emphasize one or two key words \
             with **bold**, but do not use headings, lists, or any other formatting. Respond \
             with the definition only."
        ),
    )
}

/// Prompt for the structured ASCII art.
pub fn ascii_art(topic: &Topic, style: ArtStyle) -> Prompt {
    Prompt::new(
        topic.clone(),
        ContentKind::Art,
        format!(
            "For the term \"{topic}\", generate a JSON object with one key: \"art\". The value \
             must be ASCII art that visually represents the essence of \"{topic}\". {} Keep it \
             under 20 lines and 60 columns. Use only printable ASCII characters and newlines.",
            style.prompt_hint()
        ),
    )
}

/// Prompt for the illustrative image.
pub fn image(topic: &Topic, options: &ImageOptions) -> Prompt {
    Prompt::new(
        topic.clone(),
        ContentKind::Image,
        format!(
            "{} of \"{topic}\", suitable for an encyclopedia entry. No text, captions, or \
             watermarks.",
            capitalize(options.style.prompt_hint())
        ),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
