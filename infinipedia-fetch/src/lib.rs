// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Infinipedia Fetch
//!
//! Network plumbing shared by the Infinipedia provider clients.
//!
//! - [`retry`] - Bounded exponential backoff with jitter for transient
//!   provider failures
//! - [`classify`] - Turns raw HTTP statuses, provider error bodies and
//!   transport failures into a [`ProviderErrorKind`]
//! - [`client`] - Pre-configured `reqwest` clients for single-shot and
//!   streaming calls
//! - [`stream`] - Incremental decoders for server-sent events and plain-text
//!   bodies
//!
//! ## Example
//!
//! ```ignore
//! use infinipedia_fetch::RetryPolicy;
//!
//! let policy = RetryPolicy::new(3);
//! let art = policy.run("art", || provider.generate_structured(&prompt, &schema)).await?;
//! ```
//!
//! [`ProviderErrorKind`]: infinipedia_core::ProviderErrorKind

pub mod classify;
pub mod client;
pub mod error;
pub mod retry;
pub mod stream;

pub use classify::{classify, error_from_body, error_from_reqwest};
pub use client::{HttpClient, HttpSettings, ensure_success, send};
pub use error::FetchError;
pub use retry::{RetryPolicy, with_retry};
pub use stream::{SseDecoder, Utf8Decoder, sse_data, utf8_text};
