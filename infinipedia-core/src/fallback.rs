//! Locally synthesized art used when art generation fails.

use crate::models::{ArtResult, Topic};

/// Topics longer than this are truncated in the fallback box.
pub const MAX_DISPLAY_CHARS: usize = 20;

const ELLIPSIS: &str = "...";

/// Builds the deterministic fallback art for a topic: a bordered box with
/// the topic centered inside.
///
/// ```text
/// +-----------+
/// |           |
/// |  Gravity  |
/// |           |
/// +-----------+
/// ```
pub fn fallback_art(topic: &Topic) -> ArtResult {
    let label = display_label(topic);
    let width = label.chars().count() + 4;

    let border = format!("+{}+", "-".repeat(width));
    let blank = format!("|{}|", " ".repeat(width));
    let middle = format!("|  {label}  |");

    ArtResult::new([border.as_str(), blank.as_str(), middle.as_str(), blank.as_str(), border.as_str()].join("\n"))
}

fn display_label(topic: &Topic) -> String {
    if topic.char_len() <= MAX_DISPLAY_CHARS {
        return topic.as_str().to_string();
    }
    let keep = MAX_DISPLAY_CHARS - ELLIPSIS.len();
    let mut label: String = topic.as_str().chars().take(keep).collect();
    label.push_str(ELLIPSIS);
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_box_contains_topic() {
        let art = fallback_art(&Topic::new("Gravity").unwrap());
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(
            lines,
            vec![
                "+-----------+",
                "|           |",
                "|  Gravity  |",
                "|           |",
                "+-----------+",
            ]
        );
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let topic = Topic::new("Entropy").unwrap();
        assert_eq!(fallback_art(&topic), fallback_art(&topic));
    }

    #[test]
    fn test_long_topic_truncated() {
        let topic = Topic::new("The history of the Byzantine Empire").unwrap();
        let art = fallback_art(&topic);
        assert!(art.art.contains("|  The history of th...  |"));
    }

    #[test]
    fn test_exact_threshold_not_truncated() {
        let topic = Topic::new("abcdefghijklmnopqrst").unwrap();
        assert!(fallback_art(&topic).art.contains("abcdefghijklmnopqrst"));
    }

    #[test]
    fn test_multibyte_topic_width() {
        let art = fallback_art(&Topic::new("Café").unwrap());
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines[0].chars().count(), lines[2].chars().count());
    }
}
