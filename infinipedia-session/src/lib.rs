// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Infinipedia Session
//!
//! Per-session orchestration of the three generation tasks for a topic.
//!
//! This crate provides:
//!
//! - **SessionContext**: Provider, cache, history, retry policy and
//!   generation options, constructed once and shared by every task
//! - **TopicOrchestrator**: Starts definition/art/image generation for a
//!   topic, cancels superseded work by epoch, and publishes [`ExploreState`]
//! - **ExploreState**: Observable snapshot with a derived [`ExplorePhase`]
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use infinipedia_session::{SessionContext, TopicOrchestrator, ResolveOutcome};
//!
//! let context = SessionContext::builder(provider).build();
//! let orchestrator = TopicOrchestrator::new(Arc::new(context));
//!
//! if let ResolveOutcome::Started(epoch) = orchestrator.resolve("Gravity") {
//!     let state = orchestrator.settled(epoch).await;
//!     println!("{}", state.content);
//! }
//! ```

pub mod context;
pub mod error;
pub mod generate;
pub mod orchestrator;
pub mod state;

pub use context::{SessionContext, SessionContextBuilder};
pub use error::SessionError;
pub use orchestrator::{ResolveOutcome, TopicOrchestrator};
pub use state::{Epoch, ExplorePhase, ExploreState};
