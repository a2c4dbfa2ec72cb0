//! Text output formatting with theme-aware colors.

use std::time::Duration;

use infinipedia_core::{ArtResult, ImageData, Theme, Topic};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const BRIGHT_CYAN: &str = "\x1b[96m";
const BRIGHT_YELLOW: &str = "\x1b[93m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    theme: Theme,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool, theme: Theme) -> Self {
        Self { use_colors, theme }
    }

    /// Switches the palette.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Topic heading, e.g. `── Gravity ──`.
    pub fn format_heading(&self, topic: &Topic) -> String {
        let title = format!("── {topic} ──");
        self.bold(&self.accent(&title))
    }

    /// Art block. Fallback art is marked as such.
    pub fn format_art(&self, art: &ArtResult, is_fallback: bool) -> String {
        let mut lines: Vec<String> = art.lines().map(|line| self.highlight(line)).collect();
        if is_fallback {
            lines.push(self.dim("(art unavailable, showing placeholder)"));
        }
        lines.join("\n")
    }

    /// One-line image summary.
    pub fn format_image(&self, image: Option<&ImageData>) -> String {
        match image {
            Some(image) => format!(
                "Image: {} ({})",
                image.mime_type,
                format_bytes(image.approx_size())
            ),
            None => self.dim("Image: none"),
        }
    }

    /// Numbered pickable words, wrapped to `width` columns.
    pub fn format_words(&self, words: &[Topic], width: usize) -> String {
        let mut lines = Vec::new();
        let mut line = String::new();
        let mut visible = 0usize;

        for (i, word) in words.iter().enumerate() {
            let label = format!("{}:{}", i + 1, word);
            let label_width = label.chars().count() + 1;
            if visible > 0 && visible + label_width > width {
                lines.push(std::mem::take(&mut line));
                visible = 0;
            }
            if visible > 0 {
                line.push(' ');
            }
            line.push_str(&self.dim(&format!("{}:", i + 1)));
            line.push_str(word.as_str());
            visible += label_width;
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines.join("\n")
    }

    /// Numbered history list.
    pub fn format_history(&self, entries: &[Topic]) -> String {
        if entries.is_empty() {
            return self.dim("No history yet");
        }
        entries
            .iter()
            .enumerate()
            .map(|(i, topic)| format!("{} {}", self.dim(&format!("h{}", i + 1)), topic))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Footer with the elapsed generation time.
    pub fn format_elapsed(&self, elapsed: Duration) -> String {
        self.dim(&format!("Generated in {:.1}s", elapsed.as_secs_f64()))
    }

    /// User-facing error line.
    pub fn format_error(&self, message: &str) -> String {
        self.red(message)
    }

    /// Notice for a definition that finished without text.
    pub fn format_empty(&self, topic: &Topic) -> String {
        self.yellow(&format!("Nothing was written about \"{topic}\". Try another topic."))
    }

    /// Placeholder while the definition has not produced text yet.
    pub fn format_loading(&self, topic: &Topic) -> String {
        self.dim(&format!("Looking up \"{topic}\"..."))
    }

    // ========================================================================
    // Colors
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn accent(&self, text: &str) -> String {
        match self.theme {
            Theme::Dark => self.paint(BRIGHT_CYAN, text),
            Theme::Light => self.paint(BLUE, text),
        }
    }

    fn highlight(&self, text: &str) -> String {
        match self.theme {
            Theme::Dark => self.paint(BRIGHT_YELLOW, text),
            Theme::Light => self.paint(MAGENTA, text),
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Dimmed text.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}

/// Formats a byte count, e.g. `1.5 KB`.
pub fn format_bytes(bytes: usize) -> String {
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;
    if value >= 1_048_576.0 {
        format!("{:.1} MB", value / 1_048_576.0)
    } else if value >= 1024.0 {
        format!("{:.1} KB", value / 1024.0)
    } else {
        format!("{bytes} B")
    }
}
