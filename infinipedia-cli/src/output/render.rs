//! Incremental rendering of orchestrator state.
//!
//! The renderer turns successive [`ExploreState`] snapshots into the text
//! that has not been printed yet: streamed definition text first, then the
//! numbered words, then art, image and timing once everything has settled.

use infinipedia_core::clickable_words;
use infinipedia_session::{Epoch, ExplorePhase, ExploreState};

use super::text::TextFormatter;

const WORDS_WIDTH: usize = 78;

/// Tracks what has been printed for the current epoch.
pub struct Renderer {
    formatter: TextFormatter,
    epoch: Option<Epoch>,
    printed: usize,
    definition_done: bool,
    extras_done: bool,
}

impl Renderer {
    /// Creates a renderer.
    pub fn new(formatter: TextFormatter) -> Self {
        Self {
            formatter,
            epoch: None,
            printed: 0,
            definition_done: false,
            extras_done: false,
        }
    }

    /// The underlying formatter.
    pub fn formatter(&self) -> &TextFormatter {
        &self.formatter
    }

    /// Mutable access to the formatter (theme changes).
    pub fn formatter_mut(&mut self) -> &mut TextFormatter {
        &mut self.formatter
    }

    /// True once the whole epoch has been rendered.
    pub fn is_finished(&self) -> bool {
        self.extras_done
    }

    /// Returns the text to print for `state`, empty if nothing is new.
    pub fn render(&mut self, state: &ExploreState) -> String {
        let Some(topic) = &state.topic else {
            return String::new();
        };

        let mut out = String::new();
        if self.epoch != Some(state.epoch) {
            self.epoch = Some(state.epoch);
            self.printed = 0;
            self.definition_done = false;
            self.extras_done = false;
            out.push('\n');
            out.push_str(&self.formatter.format_heading(topic));
            out.push('\n');
        }

        if !self.definition_done {
            if let Some(delta) = state.content.get(self.printed..) {
                out.push_str(delta);
                self.printed = state.content.len();
            }
        }

        if !self.definition_done && !state.definition_loading {
            self.definition_done = true;
            if self.printed > 0 {
                out.push('\n');
            }
            match state.phase() {
                ExplorePhase::Failed => {
                    let message = state.error.as_deref().unwrap_or_default();
                    out.push_str(&self.formatter.format_error(message));
                    out.push('\n');
                }
                ExplorePhase::Empty => {
                    out.push_str(&self.formatter.format_empty(topic));
                    out.push('\n');
                }
                ExplorePhase::Complete => {
                    let words = clickable_words(&state.content);
                    if !words.is_empty() {
                        out.push('\n');
                        out.push_str(&self.formatter.format_words(&words, WORDS_WIDTH));
                        out.push('\n');
                    }
                }
                ExplorePhase::Idle | ExplorePhase::Loading => {}
            }
        }

        if self.definition_done && !self.extras_done && state.is_settled() {
            self.extras_done = true;
            if let Some(art) = &state.art {
                out.push('\n');
                out.push_str(&self.formatter.format_art(art, state.art_is_fallback));
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&self.formatter.format_image(state.image.as_ref()));
            out.push('\n');
            if let Some(elapsed) = state.elapsed {
                out.push_str(&self.formatter.format_elapsed(elapsed));
                out.push('\n');
            }
        }

        out
    }
}
