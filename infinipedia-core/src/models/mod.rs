//! Domain models for Infinipedia.
//!
//! ## Submodules
//!
//! - [`topic`] - The user-chosen subject string
//! - [`content`] - Generated content and the structured-output contract
//! - [`options`] - Art/image styles, aspect ratios and the theme preference

mod content;
mod options;
mod topic;

pub use content::{ArtResult, ContentKind, ImageData, OutputSchema, Prompt};
pub use options::{ArtStyle, AspectRatio, ImageOptions, ImageStyle, Theme};
pub use topic::Topic;
