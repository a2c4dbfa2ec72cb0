//! Output formatting for CLI.

mod json;
mod render;
mod text;

pub use json::{ExploreOutput, HistoryOutput, JsonFormatter};
pub use render::Renderer;
pub use text::{TextFormatter, format_bytes};
#[cfg(test)]
mod tests;
