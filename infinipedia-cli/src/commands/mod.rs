//! CLI command implementations.

pub mod config;
pub mod define;
pub mod explore;
pub mod history;
pub mod serve;
pub mod session;
pub mod share;
