// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Infinipedia Core
//!
//! Core types, models, and traits for the Infinipedia encyclopedia.
//!
//! This crate provides the foundational abstractions used across all other
//! Infinipedia crates, including:
//!
//! - Domain models (topics, generated content, generation options)
//! - The closed provider error taxonomy
//! - The [`ContentProvider`] trait implemented by provider clients
//! - Prompt templates and the locally synthesized fallback art
//! - Presentation helpers (pickable words, shareable URLs, random topics)
//!
//! ## Key Types
//!
//! ### Topics
//! - [`Topic`] - Trimmed, case-insensitively compared subject string
//!
//! ### Content
//! - [`ContentKind`] - Definition, art or image
//! - [`ArtResult`] - Generated ASCII art
//! - [`ImageData`] - Generated image payload (base64)
//! - [`ImageOptions`] - Image style and aspect ratio
//! - [`OutputSchema`] - Structured-output contract
//!
//! ### Errors
//! - [`ProviderError`] / [`ProviderErrorKind`] - Classified provider failures
//! - [`CoreError`] - Validation errors for core types

pub mod error;
pub mod fallback;
pub mod models;
pub mod prompts;
pub mod random;
pub mod share;
pub mod traits;
pub mod words;

// Re-export error types
pub use error::{CoreError, ProviderError, ProviderErrorKind};

// Re-export all model types
pub use models::{
    // Topics
    Topic,
    // Content
    ArtResult,
    ArtStyle,
    AspectRatio,
    ContentKind,
    ImageData,
    ImageOptions,
    ImageStyle,
    OutputSchema,
    Prompt,
    Theme,
};

pub use fallback::fallback_art;
pub use random::random_topic;
pub use share::{share_url, topic_from_str, topic_from_url};
pub use traits::{ContentProvider, TextStream};
pub use words::clickable_words;
