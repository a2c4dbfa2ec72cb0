// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Infinipedia Proxy
//!
//! A small HTTP service that holds the provider credential so clients do
//! not have to. It exposes a single endpoint:
//!
//! | Method | Path | Body | Reply |
//! |--------|------|------|-------|
//! | `POST` | `/api/generate` | `{"type": "definition", "topic": "..."}` | streamed `text/plain` |
//! | `POST` | `/api/generate` | `{"type": "art", "topic": "..."}` | `{"art": "..."}` |
//!
//! Failures reply with `{"error": "..."}`: 400 for a malformed request and
//! 500 for a missing credential or a provider failure.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ProxyError;
pub use router::build_router;
pub use server::{DEFAULT_ADDR, ServerError, serve};
pub use state::ProxyState;
