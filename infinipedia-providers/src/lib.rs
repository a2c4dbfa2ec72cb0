// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Infinipedia Providers
//!
//! Concrete [`ContentProvider`] implementations.
//!
//! | Provider | Transport | Definition | Art | Image |
//! |----------|-----------|------------|-----|-------|
//! | [`GeminiClient`] | Generative Language API, API key | SSE stream | JSON schema output | Imagen `:predict` |
//! | [`ProxyClient`] | `POST /api/generate` on a proxy | `text/plain` stream | `{art}` JSON | not offered |
//!
//! ## Usage
//!
//! ```ignore
//! use infinipedia_providers::{ProviderConfig, build_provider};
//!
//! let provider = build_provider(&ProviderConfig::default())?;
//! let stream = provider.stream_text(&prompt).await?;
//! ```
//!
//! [`ContentProvider`]: infinipedia_core::ContentProvider

pub mod config;
pub mod error;
pub mod gemini;
pub mod proxy;
pub mod registry;

pub use config::{ModelConfig, ProviderConfig, ProviderSource};
pub use error::ProviderBuildError;
pub use gemini::GeminiClient;
pub use proxy::{GenerateRequest, ProxyClient};
pub use registry::{build_provider, build_provider_with};
