//! Yata - yet another task app
//!
//! A personal command-line task tracker. Tasks are kept in a local JSON
//! store and can be pushed to a cloud drive so the same list follows you
//! between machines.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod sync;
pub mod task;
pub mod ui;

// Re-export commonly used types
pub use error::{Result, YataError};

/// Current version of Yata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
